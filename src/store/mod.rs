//! Persistence seam. Services are generic over these traits; production wires
//! [`MySqlStore`], tests wire an in-memory store.

#[cfg(test)]
pub mod memory;
pub mod mysql;

use std::future::Future;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::model::attendance::{Attendance, AttendanceFilter, AttendancePatch, RosterEntry};
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::model::user::{NewUser, User, UserPatch};
use crate::query::{ListQuery, Paginated};

pub use mysql::MySqlStore;

pub type JsonRow = Map<String, Value>;

pub trait EmployeeStore {
    fn create_employee(
        &self,
        new: NewEmployee,
    ) -> impl Future<Output = Result<Employee, AppError>> + Send;

    fn find_employee(&self, id: u64) -> impl Future<Output = Result<Option<Employee>, AppError>> + Send;

    /// Every employee, newest first.
    fn all_employees(&self) -> impl Future<Output = Result<Vec<Employee>, AppError>> + Send;

    /// Runs a translated list query; rows carry only the projected columns.
    fn list_employees(
        &self,
        query: &ListQuery,
    ) -> impl Future<Output = Result<Paginated<JsonRow>, AppError>> + Send;

    fn employees_by_designation(
        &self,
        designation: &str,
    ) -> impl Future<Output = Result<Vec<Employee>, AppError>> + Send;

    /// Case-insensitive substring match on name or designation.
    fn search_employees(&self, term: &str) -> impl Future<Output = Result<Vec<Employee>, AppError>> + Send;

    fn update_employee(
        &self,
        id: u64,
        patch: EmployeePatch,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Returns the number of rows removed.
    fn delete_employee(&self, id: u64) -> impl Future<Output = Result<u64, AppError>> + Send;
}

pub trait AttendanceStore {
    /// Inserts the (employee, date) row or refreshes its check-in time.
    /// Must be atomic per (employee, date): concurrent calls never create
    /// two rows for the same pair.
    fn upsert_attendance(
        &self,
        employee_id: u64,
        date: NaiveDate,
        check_in_time: &str,
    ) -> impl Future<Output = Result<Attendance, AppError>> + Send;

    fn find_attendance(&self, id: u64) -> impl Future<Output = Result<Option<Attendance>, AppError>> + Send;

    /// Date descending.
    fn attendance_for_employee(
        &self,
        employee_id: u64,
    ) -> impl Future<Output = Result<Vec<Attendance>, AppError>> + Send;

    /// Check-in time ascending.
    fn attendance_on(&self, date: NaiveDate) -> impl Future<Output = Result<Vec<Attendance>, AppError>> + Send;

    /// Inclusive on both ends, date descending.
    fn attendance_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Attendance>, AppError>> + Send;

    /// Date descending, then check-in time ascending.
    fn list_attendance(
        &self,
        filter: &AttendanceFilter,
    ) -> impl Future<Output = Result<Vec<Attendance>, AppError>> + Send;

    /// Every employee left-joined with that day's attendance, by employee id.
    fn roster_for_day(&self, date: NaiveDate) -> impl Future<Output = Result<Vec<RosterEntry>, AppError>> + Send;

    fn update_attendance(
        &self,
        id: u64,
        patch: AttendancePatch,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    fn delete_attendance(&self, id: u64) -> impl Future<Output = Result<u64, AppError>> + Send;
}

pub trait UserStore {
    fn create_user(&self, new: NewUser) -> impl Future<Output = Result<User, AppError>> + Send;

    fn find_user(&self, id: u64) -> impl Future<Output = Result<Option<User>, AppError>> + Send;

    fn find_user_by_email(&self, email: &str) -> impl Future<Output = Result<Option<User>, AppError>> + Send;

    fn all_users(&self) -> impl Future<Output = Result<Vec<User>, AppError>> + Send;

    fn update_user(&self, id: u64, patch: UserPatch) -> impl Future<Output = Result<(), AppError>> + Send;

    fn delete_user(&self, id: u64) -> impl Future<Output = Result<u64, AppError>> + Send;
}

/// Everything a request handler needs from persistence.
pub trait Store: EmployeeStore + AttendanceStore + UserStore + Clone + Send + Sync + 'static {}

impl<T> Store for T where T: EmployeeStore + AttendanceStore + UserStore + Clone + Send + Sync + 'static {}
