// src/handlers/maintenance.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::get_rls_transaction,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::CompanyContext},
    models::maintenance::{CreateMaintenancePayload, MaintenanceRecord},
};

// GET /api/tools/{id}/maintenance-records
#[utoipa::path(
    get,
    path = "/api/tools/{id}/maintenance-records",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "ID da ferramenta")),
    responses(
        (status = 200, description = "Histórico de manutenção", body = Vec<MaintenanceRecord>),
        (status = 404, description = "Ferramenta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_maintenance_records(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    company: CompanyContext,
    Path(tool_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &company, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let records = app_state
        .maintenance_service
        .list_records(&mut *tx, company.0, tool_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(records))
}

// POST /api/tools/{id}/maintenance-records
#[utoipa::path(
    post,
    path = "/api/tools/{id}/maintenance-records",
    tag = "Maintenance",
    request_body = CreateMaintenancePayload,
    params(("id" = Uuid, Path, description = "ID da ferramenta")),
    responses(
        (status = 201, description = "Manutenção registrada", body = MaintenanceRecord),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Ferramenta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_maintenance_record(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    company: CompanyContext,
    Path(tool_id): Path<Uuid>,
    Json(payload): Json<CreateMaintenancePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &company, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let record = app_state
        .maintenance_service
        .create_record(&mut *tx, company.0, user.user_id, tool_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(record)))
}
