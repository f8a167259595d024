// src/handlers/tools.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
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
    models::tool::{
        AssignToolPayload, CreateCategoryPayload, CreateToolPayload, MaintenancePayload,
        ReturnToolPayload, ToolCategory, ToolChanges, ToolDetails, ToolQuery, ToolWithRelations,
    },
    services::label_service::LabelService,
};

// ---
// Listagem e detalhe
// ---

// GET /api/tools
#[utoipa::path(
    get,
    path = "/api/tools",
    tag = "Tools",
    params(ToolQuery),
    responses(
        (status = 200, description = "Ferramentas da empresa, mais recentes primeiro", body = Vec<ToolWithRelations>),
        (status = 400, description = "Filtro de status inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_tools(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    company: CompanyContext,
    Query(query): Query<ToolQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &company, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let tools = app_state
        .tool_service
        .fetch_tools(&mut *tx, company.0, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tools))
}

// GET /api/tools/{id}
#[utoipa::path(
    get,
    path = "/api/tools/{id}",
    tag = "Tools",
    params(("id" = Uuid, Path, description = "ID da ferramenta")),
    responses(
        (status = 200, description = "Ferramenta com relações e histórico de manutenção", body = ToolDetails),
        (status = 404, description = "Ferramenta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_tool(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    company: CompanyContext,
    Path(tool_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &company, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let details = app_state
        .tool_service
        .tool_details(&mut *tx, company.0, tool_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(details))
}

// ---
// Escrita direta
// ---

// POST /api/tools
#[utoipa::path(
    post,
    path = "/api/tools",
    tag = "Tools",
    request_body = CreateToolPayload,
    responses(
        (status = 201, description = "Ferramenta cadastrada como disponível", body = ToolWithRelations),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_tool(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    company: CompanyContext,
    Json(payload): Json<CreateToolPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &company, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let tool = app_state
        .tool_service
        .create_tool(&mut *tx, company.0, user.user_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(tool)))
}

// PATCH /api/tools/{id}
#[utoipa::path(
    patch,
    path = "/api/tools/{id}",
    tag = "Tools",
    request_body = ToolChanges,
    params(("id" = Uuid, Path, description = "ID da ferramenta")),
    responses(
        (status = 200, description = "Ferramenta atualizada", body = ToolWithRelations),
        (status = 404, description = "Ferramenta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_tool(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    company: CompanyContext,
    Path(tool_id): Path<Uuid>,
    Json(changes): Json<ToolChanges>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &company, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let tool = app_state
        .tool_service
        .update_tool(&mut *tx, company.0, tool_id, changes)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tool))
}

// DELETE /api/tools/{id}
#[utoipa::path(
    delete,
    path = "/api/tools/{id}",
    tag = "Tools",
    params(("id" = Uuid, Path, description = "ID da ferramenta")),
    responses(
        (status = 204, description = "Ferramenta removida (com histórico e manutenções)"),
        (status = 404, description = "Ferramenta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_tool(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    company: CompanyContext,
    Path(tool_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &company, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .tool_service
        .delete_tool(&mut *tx, company.0, tool_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// Ciclo de vida
// ---

// POST /api/tools/{id}/assign
#[utoipa::path(
    post,
    path = "/api/tools/{id}/assign",
    tag = "Tools",
    request_body = AssignToolPayload,
    params(("id" = Uuid, Path, description = "ID da ferramenta")),
    responses(
        (status = 200, description = "Ferramenta emprestada (em uso)", body = ToolWithRelations),
        (status = 404, description = "Ferramenta ou responsável não encontrado"),
        (status = 409, description = "A ferramenta não está disponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_tool(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    company: CompanyContext,
    Path(tool_id): Path<Uuid>,
    Json(payload): Json<AssignToolPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &company, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let tool = app_state
        .tool_service
        .assign_tool(&mut *tx, company.0, user.user_id, tool_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tool))
}

// POST /api/tools/{id}/return
#[utoipa::path(
    post,
    path = "/api/tools/{id}/return",
    tag = "Tools",
    request_body = ReturnToolPayload,
    params(("id" = Uuid, Path, description = "ID da ferramenta")),
    responses(
        (status = 200, description = "Ferramenta devolvida (disponível)", body = ToolWithRelations),
        (status = 409, description = "A ferramenta não está em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn return_tool(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    company: CompanyContext,
    Path(tool_id): Path<Uuid>,
    Json(payload): Json<ReturnToolPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &company, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let tool = app_state
        .tool_service
        .return_tool(&mut *tx, company.0, user.user_id, tool_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tool))
}

// POST /api/tools/{id}/maintenance
#[utoipa::path(
    post,
    path = "/api/tools/{id}/maintenance",
    tag = "Tools",
    request_body = MaintenancePayload,
    params(("id" = Uuid, Path, description = "ID da ferramenta")),
    responses(
        (status = 200, description = "Ferramenta enviada para manutenção", body = ToolWithRelations),
        (status = 409, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_to_maintenance(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    company: CompanyContext,
    Path(tool_id): Path<Uuid>,
    Json(payload): Json<MaintenancePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &company, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let tool = app_state
        .tool_service
        .send_to_maintenance(&mut *tx, company.0, user.user_id, tool_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tool))
}

// POST /api/tools/{id}/maintenance/return
#[utoipa::path(
    post,
    path = "/api/tools/{id}/maintenance/return",
    tag = "Tools",
    request_body = ReturnToolPayload,
    params(("id" = Uuid, Path, description = "ID da ferramenta")),
    responses(
        (status = 200, description = "Ferramenta de volta da manutenção", body = ToolWithRelations),
        (status = 409, description = "A ferramenta não está em manutenção")
    ),
    security(("api_jwt" = []))
)]
pub async fn return_from_maintenance(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    company: CompanyContext,
    Path(tool_id): Path<Uuid>,
    Json(payload): Json<ReturnToolPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &company, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let tool = app_state
        .tool_service
        .return_from_maintenance(&mut *tx, company.0, user.user_id, tool_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tool))
}

// ---
// Etiqueta
// ---

// GET /api/tools/{id}/qrcode
#[utoipa::path(
    get,
    path = "/api/tools/{id}/qrcode",
    tag = "Tools",
    params(("id" = Uuid, Path, description = "ID da ferramenta")),
    responses(
        (status = 200, description = "Etiqueta QR em PNG", content_type = "image/png", body = Vec<u8>),
        (status = 404, description = "Ferramenta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_tool_qrcode(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    company: CompanyContext,
    Path(tool_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &company, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let details = app_state
        .tool_service
        .tool_details(&mut *tx, company.0, tool_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let png = app_state
        .label_service
        .render_png(&LabelService::label_payload(&details.tool.tool))
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

// ---
// Categorias
// ---

// GET /api/categories
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Tools",
    responses(
        (status = 200, description = "Categorias da empresa", body = Vec<ToolCategory>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    company: CompanyContext,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &company, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let categories = app_state
        .tool_service
        .list_categories(&mut *tx, company.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(categories))
}

// POST /api/categories
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Tools",
    request_body = CreateCategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = ToolCategory),
        (status = 409, description = "Categoria já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    company: CompanyContext,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &company, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let category = app_state
        .tool_service
        .create_category(&mut *tx, company.0, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(category)))
}
