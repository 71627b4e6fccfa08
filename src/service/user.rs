use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::model::user::{NewUser, User, UserPatch};
use crate::store::UserStore;

const MIN_PASSWORD_LEN: usize = 6;

/// Fields a caller may send when creating or editing an HR user.
#[derive(Debug, Clone, Default)]
pub struct UserInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::invalid("Please provide a valid email"));
    }
    Ok(email)
}

fn check_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid("Password must be at least 6 characters"));
    }
    Ok(())
}

fn normalize_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    match name.chars().count() {
        0..=2 => Err(AppError::invalid("Name must be at least 3 characters")),
        256.. => Err(AppError::invalid("Name cannot exceed 255 characters")),
        _ => Ok(name.to_string()),
    }
}

pub async fn create_user<S: UserStore>(store: &S, input: UserInput) -> Result<User, AppError> {
    let (Some(email), Some(password), Some(name)) = (input.email, input.password, input.name) else {
        return Err(AppError::invalid("Email, password and name are required"));
    };
    let email = normalize_email(&email)?;
    check_password(&password)?;
    let name = normalize_name(&name)?;

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::conflict("User with this email already exists"));
    }

    let user = store
        .create_user(NewUser {
            email,
            password_hash: hash_password(&password)?,
            name,
        })
        .await?;
    info!(user_id = user.id, "User created");
    Ok(user)
}

pub async fn get_user<S: UserStore>(store: &S, id: u64) -> Result<User, AppError> {
    store
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

pub async fn list_users<S: UserStore>(store: &S) -> Result<Vec<User>, AppError> {
    store.all_users().await
}

pub async fn update_user<S: UserStore>(store: &S, id: u64, input: UserInput) -> Result<User, AppError> {
    if input.email.is_none() && input.password.is_none() && input.name.is_none() {
        return Err(AppError::invalid("At least one field is required"));
    }
    let email = input.email.as_deref().map(normalize_email).transpose()?;
    let name = input.name.as_deref().map(normalize_name).transpose()?;
    if let Some(password) = &input.password {
        check_password(password)?;
    }

    get_user(store, id).await?;
    if let Some(email) = &email {
        if let Some(other) = store.find_user_by_email(email).await? {
            if other.id != id {
                return Err(AppError::conflict("Email already in use"));
            }
        }
    }

    let password_hash = input.password.as_deref().map(hash_password).transpose()?;
    store
        .update_user(
            id,
            UserPatch {
                email,
                password_hash,
                name,
            },
        )
        .await?;
    info!(user_id = id, "User updated");
    get_user(store, id).await
}

pub async fn delete_user<S: UserStore>(store: &S, id: u64) -> Result<(), AppError> {
    if store.delete_user(id).await? == 0 {
        return Err(AppError::not_found("User not found"));
    }
    info!(user_id = id, "User deleted");
    Ok(())
}

/// Looks up the user by email and checks the password. Unknown email and
/// wrong password fail the same way.
pub async fn authenticate<S: UserStore>(store: &S, email: &str, password: &str) -> Result<User, AppError> {
    let invalid = || AppError::unauthorized("Invalid credentials");

    let email = email.trim().to_lowercase();
    let user = store.find_user_by_email(&email).await?.ok_or_else(invalid)?;
    if !verify_password(password, &user.password_hash) {
        return Err(invalid());
    }
    Ok(user)
}
