mod login;
mod logout;
mod register;

use std::fmt;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Router, routing::post};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{AppError, AppResult, AppState};

use login::login;
use logout::logout;
use register::register;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Email already exists")]
    EmailTaken,
    #[error("Invalid email or password")]
    InvalidCredentials,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        use Role::*;
        match self {
            Guest => "guest",
            User => "user",
            Admin => "admin",
        }
    }

    fn parse(s: &str) -> Option<Role> {
        [Role::Guest, Role::User, Role::Admin]
            .into_iter()
            .find(|role| role.as_str() == s)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

pub(crate) fn verify_password(password: &str, password_hash: &str) -> bool {
    let hash = match PasswordHash::new(password_hash) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("failed to parse password hash: {e}");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok()
}

fn required(value: Option<String>, field: &'static str) -> Result<String, AccountError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(AccountError::MissingField(field))
}

pub(crate) async fn create_account(
    db_pool: &SqlitePool,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> AppResult<Account> {
    let password_hash = hash_password(password)?;
    let id = sqlx::query("INSERT INTO users (name,email,password_hash,role) VALUES (?,?,?,?)")
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .bind(role.as_str())
        .execute(db_pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => AppError::from(AccountError::EmailTaken),
            _ => AppError::from(e),
        })?
        .last_insert_rowid();

    tracing::info!(id, %role, "registered account");
    Ok(Account {
        id,
        name: name.to_owned(),
        email: email.to_owned(),
        role,
    })
}

pub(crate) async fn authenticate(db_pool: &SqlitePool, email: &str, password: &str) -> AppResult<Account> {
    let row: Option<(i64, String, String, String)> =
        sqlx::query_as("SELECT id,name,password_hash,role FROM users WHERE email=?")
            .bind(email)
            .fetch_optional(db_pool)
            .await?;

    let Some((id, name, password_hash, role)) = row else {
        return Err(AccountError::InvalidCredentials.into());
    };
    if !verify_password(password, &password_hash) {
        return Err(AccountError::InvalidCredentials.into());
    }

    Ok(Account {
        id,
        name,
        email: email.to_owned(),
        role: Role::parse(&role).unwrap_or_default(),
    })
}
