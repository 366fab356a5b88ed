use axum::{
    Json, debug_handler,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::{AppClassifier, AppResult, AppState, session::USER_ID, sentiment::Sentiment};

use super::{FeedbackEntry, FeedbackError, HistoryEntry, SqliteStore, Submitted, Summary};

#[derive(Deserialize)]
pub(crate) struct SubmitRequest {
    message: Option<String>,
    user_id: Option<Value>,
}

/// Browser clients send the id read back from local storage, so a numeric
/// string is as good as a number. Null or "" means no user.
pub(crate) fn parse_user_id(value: Option<Value>) -> Result<Option<i64>, FeedbackError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or(FeedbackError::InvalidUserId),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| FeedbackError::InvalidUserId),
        Some(_) => Err(FeedbackError::InvalidUserId),
    }
}

#[derive(Deserialize)]
pub(crate) struct ListQuery {
    sentiment: Option<String>,
}

/// Anything but one of the three labels, "All" included, means no filter.
pub(crate) fn parse_filter(value: Option<&str>) -> Option<Sentiment> {
    let value = value?;
    match value.parse::<Sentiment>() {
        Ok(sentiment) => Some(sentiment),
        Err(e) => {
            if !value.eq_ignore_ascii_case("all") {
                tracing::debug!("treating filter as All: {e}");
            }
            None
        }
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn submit(
    State(store): State<SqliteStore>,
    State(classifier): State<AppClassifier>,
    session: Session,
    Json(SubmitRequest { message, user_id }): Json<SubmitRequest>,
) -> AppResult<Json<Submitted>> {
    let user_id = match parse_user_id(user_id)? {
        Some(user_id) => Some(user_id),
        None => session.get::<i64>(USER_ID).await?,
    };

    let submitted = super::submit_feedback(
        &store,
        &classifier,
        message.as_deref().unwrap_or_default(),
        user_id,
    )
    .await?;
    Ok(Json(submitted))
}

#[debug_handler(state = AppState)]
pub(crate) async fn summary(State(store): State<SqliteStore>) -> AppResult<Json<Summary>> {
    Ok(Json(super::get_summary(&store).await?))
}

#[debug_handler(state = AppState)]
pub(crate) async fn list(
    State(store): State<SqliteStore>,
    Query(ListQuery { sentiment }): Query<ListQuery>,
) -> AppResult<Json<Vec<FeedbackEntry>>> {
    let filter = parse_filter(sentiment.as_deref());
    Ok(Json(super::list_feedback(&store, filter).await?))
}

#[debug_handler(state = AppState)]
pub(crate) async fn get_one(
    State(store): State<SqliteStore>,
    Path(id): Path<i64>,
) -> AppResult<Json<FeedbackEntry>> {
    Ok(Json(super::get_feedback(&store, id).await?))
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete(
    State(store): State<SqliteStore>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    super::delete_feedback(&store, id).await?;
    Ok(Json(json!({ "message": "Feedback deleted" })))
}

#[debug_handler(state = AppState)]
pub(crate) async fn history(
    State(store): State<SqliteStore>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    Ok(Json(super::get_user_history(&store, user_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_is_permissive() {
        assert_eq!(parse_filter(None), None);
        assert_eq!(parse_filter(Some("All")), None);
        assert_eq!(parse_filter(Some("Postive")), None);
        assert_eq!(parse_filter(Some("")), None);
        assert_eq!(parse_filter(Some("Positive")), Some(Sentiment::Positive));
        assert_eq!(parse_filter(Some("neutral")), Some(Sentiment::Neutral));
    }

    #[test]
    fn user_id_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_user_id(None).unwrap(), None);
        assert_eq!(parse_user_id(Some(Value::Null)).unwrap(), None);
        assert_eq!(parse_user_id(Some(json!(""))).unwrap(), None);
        assert_eq!(parse_user_id(Some(json!(3))).unwrap(), Some(3));
        assert_eq!(parse_user_id(Some(json!("3"))).unwrap(), Some(3));
        assert_eq!(parse_user_id(Some(json!(" 12 "))).unwrap(), Some(12));

        for bad in [json!("abc"), json!(1.5), json!(true), json!([3]), json!({ "id": 3 })] {
            assert!(matches!(parse_user_id(Some(bad)), Err(FeedbackError::InvalidUserId)));
        }
    }
}
