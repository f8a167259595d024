// src/handlers/auth.rs

use axum::{extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse, Json};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::{AuthResponse, SessionInfo, SignInPayload, SignUpPayload},
};

// POST /api/auth/sign-up
#[utoipa::path(
    post,
    path = "/api/auth/sign-up",
    tag = "Auth",
    request_body = SignUpPayload,
    responses(
        (status = 201, description = "Usuário cadastrado", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn sign_up(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<SignUpPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .auth_service
        .sign_up(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(response)))
}

// POST /api/auth/sign-in
#[utoipa::path(
    post,
    path = "/api/auth/sign-in",
    tag = "Auth",
    request_body = SignInPayload,
    responses(
        (status = 200, description = "Sessão aberta", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn sign_in(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<SignInPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .auth_service
        .sign_in(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(response))
}

// POST /api/auth/sign-out
// Sempre 204: falhas ao revogar ficam só no log
#[utoipa::path(
    post,
    path = "/api/auth/sign-out",
    tag = "Auth",
    responses((status = 204, description = "Sessão encerrada")),
    security(("api_jwt" = []))
)]
pub async fn sign_out(State(app_state): State<AppState>, user: AuthenticatedUser) -> StatusCode {
    app_state.auth_service.sign_out(&user).await;
    StatusCode::NO_CONTENT
}

// GET /api/auth/session
#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "Auth",
    responses(
        (status = 200, description = "Sessão atual (ou nula) e rota de entrada", body = SessionInfo)
    )
)]
pub async fn get_session(State(app_state): State<AppState>, headers: HeaderMap) -> Json<SessionInfo> {
    let bearer = headers.typed_get::<Authorization<Bearer>>();
    let token = bearer.as_ref().map(|b| b.token());
    Json(app_state.auth_service.session_info(token).await)
}
