use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Perfil não encontrado")]
    ProfileNotFound,

    #[error("Ferramenta não encontrada")]
    ToolNotFound,

    #[error("Notificação não encontrada")]
    NotificationNotFound,

    #[error("Categoria já existe: {0}")]
    CategoryNameAlreadyExists(String),

    #[error("Transição inválida: {action} a partir de {from}")]
    InvalidTransition { from: String, action: String },

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // `anyhow::Error` captura o contexto de erros inesperados.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// `true` quando o erro é uma violação de chave única (SQLSTATE 23505).
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::DatabaseError(e) => is_unique_violation(e),
            _ => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists | AppError::CategoryNameAlreadyExists(_) => {
                StatusCode::CONFLICT
            }
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::ProfileNotFound | AppError::ToolNotFound | AppError::NotificationNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::DatabaseError(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_failed",
            AppError::EmailAlreadyExists => "email_already_exists",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::ProfileNotFound => "profile_not_found",
            AppError::ToolNotFound => "tool_not_found",
            AppError::NotificationNotFound => "notification_not_found",
            AppError::CategoryNameAlreadyExists(_) => "category_already_exists",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::DatabaseError(sqlx::Error::RowNotFound) => "record_not_found",
            _ => "unexpected_error",
        }
    }

    /// Converte o erro de domínio na resposta HTTP, traduzida para o idioma pedido.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("🔥 Erro Interno do Servidor: {:?}", self);
        }

        let mut message = i18n.translate(&locale.0, self.message_key());
        let details = match self {
            AppError::ValidationError(errors) => Some(validation_details(errors)),
            AppError::CategoryNameAlreadyExists(name) => {
                message = format!("{message} ({name})");
                None
            }
            AppError::InvalidTransition { from, action } => {
                Some(json!({ "from": from, "action": action }))
            }
            _ => None,
        };

        ApiError {
            status,
            error: message,
            details,
        }
    }
}

pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

// Campo -> mensagens de validação
fn validation_details(errors: &validator::ValidationErrors) -> Value {
    let mut details = serde_json::Map::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        details.insert(field.to_string(), json!(messages));
    }
    Value::Object(details)
}

/// Corpo de erro devolvido pela API: `{ "error": "...", "details": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

// Sem contexto de idioma (ex.: middlewares), responde em português.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &I18nStore::default())
            .into_response()
    }
}
