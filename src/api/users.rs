use axum::{
    Json,
    extract::{FromRequest, Path, State, rejection::JsonRejection},
};

use crate::api::server::AppState;
use crate::db::models::{User, UserPatch};
use crate::error::{AppError, Result};

/// `Json` extractor whose rejections become validation errors (400).
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

pub async fn upsert_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    JsonBody(patch): JsonBody<UserPatch>,
) -> Result<Json<User>> {
    let user = state.users.upsert(&username, patch).await?;
    Ok(Json(user))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = state.users.list_all().await?;
    Ok(Json(users))
}
