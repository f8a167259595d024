// src/handlers/activities.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::{db_utils::get_rls_transaction, error::ApiError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::CompanyContext},
    models::movement::Activity,
};

// GET /api/activities
#[utoipa::path(
    get,
    path = "/api/activities",
    tag = "Activities",
    responses(
        (status = 200, description = "Até 100 movimentações, mais recentes primeiro", body = Vec<Activity>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_activities(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    company: CompanyContext,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &company, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let activities = app_state
        .activity_service
        .fetch_activities(&mut *tx, company.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(activities))
}
