use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::AppResult;

use super::{Role, create_account, required};

#[derive(Deserialize)]
pub(crate) struct RegisterRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: Option<Role>,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn register(
    State(db_pool): State<SqlitePool>,
    Json(RegisterRequest { name, email, password, role }): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let name = required(name, "name")?;
    let email = required(email, "email")?;
    let password = required(password, "password")?;

    create_account(&db_pool, &name, &email, &password, role.unwrap_or_default()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}
