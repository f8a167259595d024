// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::common::error::AppError;

/// Empresa (tenant) do usuário autenticado, resolvida pelo `company_guard`
/// a partir do perfil. Nunca vem de cabeçalho do cliente.
#[derive(Debug, Clone, Copy)]
pub struct CompanyContext(pub Uuid);

impl<S> FromRequestParts<S> for CompanyContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CompanyContext>()
            .copied()
            .ok_or(AppError::ProfileNotFound)
    }
}
