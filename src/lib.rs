pub mod accounts;
pub mod config;
pub mod db;
pub mod feedback;
pub mod sentiment;
pub mod session;

use axum::{Json, Router, extract::FromRef, http::StatusCode, response::{IntoResponse, Response}};
use serde_json::json;
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use accounts::AccountError;
use feedback::{FeedbackError, SqliteStore};
use sentiment::{Classifier, PolarityScorer};

pub type AppClassifier = Classifier<PolarityScorer>;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub store: SqliteStore,
    pub classifier: AppClassifier,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, scorer: PolarityScorer) -> Self {
        Self {
            store: SqliteStore::new(db_pool.clone()),
            db_pool,
            classifier: Classifier::new(scorer),
        }
    }
}

pub fn app(app_state: AppState, session_inactivity: time::Duration) -> Router {
    let api = Router::new()
        .merge(accounts::router())
        .merge(feedback::router());

    Router::new()
        .nest("/api", api)
        .with_state(app_state)
        .layer(session::layer(session_inactivity))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub type AppResult<T> = Result<T, AppError>;
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<FeedbackError>() {
            return match err {
                FeedbackError::EmptyMessage | FeedbackError::InvalidUserId => StatusCode::BAD_REQUEST,
                FeedbackError::NotFound(_) => StatusCode::NOT_FOUND,
                FeedbackError::Scorer(_) => StatusCode::SERVICE_UNAVAILABLE,
                FeedbackError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }

        if let Some(err) = self.0.downcast_ref::<AccountError>() {
            return match err {
                AccountError::MissingField(_) | AccountError::EmailTaken => StatusCode::BAD_REQUEST,
                AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            };
        }

        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{:#}\n\n{}", self.0, self.0.backtrace());
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        Self(anyhow::Error::msg(err))
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        Self(anyhow::Error::msg(err.to_owned()))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(FeedbackError);
apperr_impl!(AccountError);
apperr_impl!(serde_json::Error);
apperr_impl!(sqlx::Error);
apperr_impl!(tower_sessions::session::Error);
apperr_impl!(axum::Error);
