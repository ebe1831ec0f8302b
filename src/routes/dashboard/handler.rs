use axum::{
    extract::{Json, State},
    response::IntoResponse,
};

use crate::{
    AppState,
    error::ApiError,
    routes::{book::Book, user::User},
};

use super::model::DashboardSummary;

pub async fn get_dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    const FAILURE: &str = "Failed to load dashboard data";

    let (users, books) = tokio::try_join!(User::find_all(&state.store), Book::find_all(&state.store))
        .map_err(|e| e.during(FAILURE))?;

    Ok(Json(DashboardSummary::build(&users, &books)))
}
