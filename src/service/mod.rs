//! Validation and business rules. Every function is generic over the store
//! traits it needs and returns typed [`AppError`](crate::error::AppError)s.

pub mod attendance;
pub mod employee;
pub mod report;
pub mod user;
