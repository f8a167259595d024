// src/db/user_repo.rs

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{AuthSession, AuthUser},
};

// O repositório de credenciais: tabelas 'auth_users' e 'auth_sessions'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo e-mail (sem diferenciar maiúsculas)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AppError> {
        let maybe_user = sqlx::query_as::<_, AuthUser>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM auth_users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Cria a credencial. Os metadados do cadastro alimentam o gatilho de perfil.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        password_hash: &str,
        user_metadata: &Value,
    ) -> Result<AuthUser, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, AuthUser>(
            r#"
            INSERT INTO auth_users (email, password_hash, user_metadata)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(user_metadata)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })
    }

    // ---
    // Sessões
    // ---

    pub async fn create_session(
        &self,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<AuthSession, AppError> {
        let session = sqlx::query_as::<_, AuthSession>(
            r#"
            INSERT INTO auth_sessions (user_id, expires_at)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(session)
    }

    pub async fn find_session(&self, session_id: Uuid) -> Result<Option<AuthSession>, AppError> {
        let session = sqlx::query_as::<_, AuthSession>("SELECT * FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(session)
    }

    /// Marca a sessão como revogada. Revogar duas vezes não altera a data original.
    pub async fn revoke_session(&self, session_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE auth_sessions SET revoked_at = now() WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(session_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
