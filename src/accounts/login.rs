use axum::{Json, debug_handler, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{AppResult, session::USER_ID};

use super::{authenticate, required};

#[derive(Deserialize)]
pub(crate) struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(LoginRequest { email, password }): Json<LoginRequest>,
) -> AppResult<Json<Value>> {
    let email = required(email, "email")?;
    let password = required(password, "password")?;

    let account = authenticate(&db_pool, &email, &password).await?;
    session.cycle_id().await?;
    session.insert(USER_ID, account.id).await?;

    tracing::info!(id = account.id, "welcome {}", account.name);
    Ok(Json(json!({ "user": account })))
}
