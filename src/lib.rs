//! Canteiro: controle de ferramentas de obra.
//!
//! API HTTP (`axum` + `sqlx`/Postgres) e um cliente tipado (`client`) usado
//! pelo app móvel.

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod client;
pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::middleware::auth::{auth_guard, company_guard};

/// Monta o router completo da API.
pub fn app(app_state: AppState) -> Router {
    // Rotas públicas de autenticação
    let public_routes = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/sign-up", post(handlers::auth::sign_up))
        .route("/api/auth/sign-in", post(handlers::auth::sign_in))
        .route("/api/auth/session", get(handlers::auth::get_session));

    // Exigem apenas um token válido
    let user_routes = Router::new()
        .route("/api/auth/sign-out", post(handlers::auth::sign_out))
        .route(
            "/api/profile",
            get(handlers::profile::get_profile).patch(handlers::profile::update_profile),
        )
        .route("/api/profile/stats", get(handlers::profile::get_user_stats))
        .route("/api/notifications", get(handlers::notifications::list_notifications))
        .route(
            "/api/notifications/{id}/read",
            post(handlers::notifications::mark_notification_read),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Exigem token e perfil (empresa resolvida)
    let company_routes = Router::new()
        .route(
            "/api/tools",
            get(handlers::tools::list_tools).post(handlers::tools::create_tool),
        )
        .route(
            "/api/tools/{id}",
            get(handlers::tools::get_tool)
                .patch(handlers::tools::update_tool)
                .delete(handlers::tools::delete_tool),
        )
        .route("/api/tools/{id}/assign", post(handlers::tools::assign_tool))
        .route("/api/tools/{id}/return", post(handlers::tools::return_tool))
        .route(
            "/api/tools/{id}/maintenance",
            post(handlers::tools::send_to_maintenance),
        )
        .route(
            "/api/tools/{id}/maintenance/return",
            post(handlers::tools::return_from_maintenance),
        )
        .route("/api/tools/{id}/qrcode", get(handlers::tools::get_tool_qrcode))
        .route(
            "/api/tools/{id}/maintenance-records",
            get(handlers::maintenance::list_maintenance_records)
                .post(handlers::maintenance::create_maintenance_record),
        )
        .route(
            "/api/categories",
            get(handlers::tools::list_categories).post(handlers::tools::create_category),
        )
        .route("/api/activities", get(handlers::activities::list_activities))
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            company_guard,
        ));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(company_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state)
}
