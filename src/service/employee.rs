use rust_decimal::Decimal;
use tracing::info;

use crate::error::AppError;
use crate::model::employee::{EMPLOYEE_SEARCH_FIELDS, Employee, EmployeePatch, NewEmployee};
use crate::query::{ListQuery, Paginated, QueryMap};
use crate::store::{EmployeeStore, JsonRow};

const MIN_AGE: u32 = 18;
const MAX_AGE: u32 = 70;

fn check_name(name: &str) -> Result<(), AppError> {
    let len = name.trim().chars().count();
    if len < 3 {
        return Err(AppError::invalid("Name must be at least 3 characters"));
    }
    if len > 255 {
        return Err(AppError::invalid("Name cannot exceed 255 characters"));
    }
    Ok(())
}

fn check_designation(designation: &str) -> Result<(), AppError> {
    let len = designation.trim().chars().count();
    if len < 2 {
        return Err(AppError::invalid("Designation must be at least 2 characters"));
    }
    if len > 255 {
        return Err(AppError::invalid("Designation cannot exceed 255 characters"));
    }
    Ok(())
}

fn check_age(age: u32) -> Result<(), AppError> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(AppError::invalid("Employee age must be between 18 and 70"));
    }
    Ok(())
}

/// Rounds to cents; the rounded amount must still be positive.
fn normalize_salary(salary: Decimal) -> Result<Decimal, AppError> {
    let salary = salary.round_dp(2);
    if salary <= Decimal::ZERO {
        return Err(AppError::invalid("Salary must be greater than 0"));
    }
    Ok(salary)
}

fn check_dates(hiring_date: chrono::NaiveDate, date_of_birth: chrono::NaiveDate) -> Result<(), AppError> {
    if hiring_date < date_of_birth {
        return Err(AppError::invalid("Hiring date cannot be before date of birth"));
    }
    Ok(())
}

pub fn validate_new(mut new: NewEmployee) -> Result<NewEmployee, AppError> {
    check_name(&new.name)?;
    check_age(new.age)?;
    check_designation(&new.designation)?;
    new.salary = normalize_salary(new.salary)?;
    check_dates(new.hiring_date, new.date_of_birth)?;
    new.name = new.name.trim().to_string();
    new.designation = new.designation.trim().to_string();
    Ok(new)
}

pub async fn create_employee<S: EmployeeStore>(store: &S, new: NewEmployee) -> Result<Employee, AppError> {
    let new = validate_new(new)?;
    let employee = store.create_employee(new).await?;
    info!(employee_id = employee.id, "Employee created successfully");
    Ok(employee)
}

pub async fn get_employee<S: EmployeeStore>(store: &S, id: u64) -> Result<Employee, AppError> {
    store
        .find_employee(id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee not found"))
}

pub async fn list_employees<S: EmployeeStore>(
    store: &S,
    params: &QueryMap,
) -> Result<Paginated<JsonRow>, AppError> {
    let query = ListQuery::parse(params, EMPLOYEE_SEARCH_FIELDS);
    store.list_employees(&query).await
}

pub async fn search_employees<S: EmployeeStore>(store: &S, term: &str) -> Result<Vec<Employee>, AppError> {
    let term = term.trim();
    if term.is_empty() {
        return Err(AppError::invalid("Search query is required"));
    }

    let employees = store.search_employees(term).await?;
    if employees.is_empty() {
        return Err(AppError::not_found(format!("No employees found matching: {term}")));
    }
    Ok(employees)
}

pub async fn employees_by_designation<S: EmployeeStore>(
    store: &S,
    designation: &str,
) -> Result<Vec<Employee>, AppError> {
    let employees = store.employees_by_designation(designation).await?;
    if employees.is_empty() {
        return Err(AppError::not_found(format!(
            "No employees found with designation: {designation}"
        )));
    }
    Ok(employees)
}

pub async fn update_employee<S: EmployeeStore>(
    store: &S,
    id: u64,
    mut patch: EmployeePatch,
) -> Result<Employee, AppError> {
    if patch.is_empty() {
        return Err(AppError::invalid("At least one field is required"));
    }
    if let Some(name) = patch.name.as_mut() {
        check_name(name)?;
        *name = name.trim().to_string();
    }
    if let Some(age) = patch.age {
        check_age(age)?;
    }
    if let Some(designation) = patch.designation.as_mut() {
        check_designation(designation)?;
        *designation = designation.trim().to_string();
    }
    if let Some(salary) = patch.salary {
        patch.salary = Some(normalize_salary(salary)?);
    }

    let current = get_employee(store, id).await?;
    check_dates(
        patch.hiring_date.unwrap_or(current.hiring_date),
        patch.date_of_birth.unwrap_or(current.date_of_birth),
    )?;

    store.update_employee(id, patch).await?;
    info!(employee_id = id, "Employee updated successfully");
    get_employee(store, id).await
}

pub async fn delete_employee<S: EmployeeStore>(store: &S, id: u64) -> Result<(), AppError> {
    if store.delete_employee(id).await? == 0 {
        return Err(AppError::not_found("Employee not found"));
    }
    info!(employee_id = id, "Employee deleted successfully");
    Ok(())
}
