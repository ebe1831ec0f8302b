use axum::{
    extract::{Json, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    error::{ApiError, AppError},
    utils::{MessageResponse, parse_id},
};

use super::model::{User, UserInput};

const ENTITY: &str = "User";

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = User::find_all(&state.store)
        .await
        .map_err(|e| e.during("Failed to fetch users"))?;

    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    const FAILURE: &str = "Failed to create user";

    let Json(input) = payload.map_err(|e| AppError::from(e).during(FAILURE))?;
    let user = User::create(&state.store, input, state.config.password_hash_cost)
        .await
        .map_err(|e| e.during(FAILURE))?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    const FAILURE: &str = "Failed to fetch user";

    let id = parse_id(&id, ENTITY).map_err(|e| e.during(FAILURE))?;
    match User::find_by_id(&state.store, id).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err(AppError::NotFound(ENTITY).during(FAILURE)),
        Err(e) => Err(e.during(FAILURE)),
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    const FAILURE: &str = "Failed to update user";

    let Json(input) = payload.map_err(|e| AppError::from(e).during(FAILURE))?;
    let id = parse_id(&id, ENTITY).map_err(|e| e.during(FAILURE))?;
    match User::update(&state.store, id, input, state.config.password_hash_cost).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err(AppError::NotFound(ENTITY).during(FAILURE)),
        Err(e) => Err(e.during(FAILURE)),
    }
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    const FAILURE: &str = "Failed to delete user";

    let id = parse_id(&id, ENTITY).map_err(|e| e.during(FAILURE))?;
    match User::delete(&state.store, id).await {
        Ok(true) => {
            tracing::info!("Deleted user: {}", id);
            Ok(Json(MessageResponse::new("User deleted successfully")))
        }
        Ok(false) => Err(AppError::NotFound(ENTITY).during(FAILURE)),
        Err(e) => Err(e.during(FAILURE)),
    }
}
