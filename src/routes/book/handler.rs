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

use super::model::{Book, BookInput};

const ENTITY: &str = "Book";

pub async fn list_books(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let books = Book::find_all(&state.store)
        .await
        .map_err(|e| e.during("Failed to fetch books"))?;

    Ok(Json(books))
}

pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    const FAILURE: &str = "Failed to create book";

    let Json(input) = payload.map_err(|e| AppError::from(e).during(FAILURE))?;
    let book = Book::create(&state.store, input)
        .await
        .map_err(|e| e.during(FAILURE))?;

    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    const FAILURE: &str = "Failed to fetch book";

    let id = parse_id(&id, ENTITY).map_err(|e| e.during(FAILURE))?;
    match Book::find_by_id(&state.store, id).await {
        Ok(Some(book)) => Ok(Json(book)),
        Ok(None) => Err(AppError::NotFound(ENTITY).during(FAILURE)),
        Err(e) => Err(e.during(FAILURE)),
    }
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    const FAILURE: &str = "Failed to update book";

    let Json(input) = payload.map_err(|e| AppError::from(e).during(FAILURE))?;
    let id = parse_id(&id, ENTITY).map_err(|e| e.during(FAILURE))?;
    match Book::update(&state.store, id, input).await {
        Ok(Some(book)) => Ok(Json(book)),
        Ok(None) => Err(AppError::NotFound(ENTITY).during(FAILURE)),
        Err(e) => Err(e.during(FAILURE)),
    }
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    const FAILURE: &str = "Failed to delete book";

    let id = parse_id(&id, ENTITY).map_err(|e| e.during(FAILURE))?;
    match Book::delete(&state.store, id).await {
        Ok(true) => {
            tracing::info!("Deleted book: {}", id);
            Ok(Json(MessageResponse::new("Book deleted successfully")))
        }
        Ok(false) => Err(AppError::NotFound(ENTITY).during(FAILURE)),
        Err(e) => Err(e.during(FAILURE)),
    }
}
