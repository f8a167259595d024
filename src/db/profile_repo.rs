// src/db/profile_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::profile::{Profile, ProfileWithCompany, UpdateProfilePayload, UserRole, UserStats},
};

const PROFILE_WITH_COMPANY: &str = r#"
    SELECT p.*,
           CASE WHEN co.id IS NULL THEN NULL ELSE to_jsonb(co) END AS company
    FROM profiles p
    LEFT JOIN companies co ON co.id = p.company_id
"#;

/// Dados do cadastro repassados ao procedimento `create_profile_for_user`.
#[derive(Debug, Clone)]
pub struct ProfileProvisioning<'a> {
    pub user_id: Uuid,
    pub email: &'a str,
    pub full_name: &'a str,
    pub cpf: &'a str,
    pub role: &'a str,
    pub company_code: &'a str,
    pub phone: Option<&'a str>,
    /// Empresa usada quando o código não existe (`DEFAULT_COMPANY_NAME`).
    pub fallback_company_name: &'a str,
}

#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn exists<'e, E>(&self, executor: E, user_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM profiles WHERE id = $1)")
                .bind(user_id)
                .fetch_one(executor)
                .await?;
        Ok(exists)
    }

    pub async fn find_with_company<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<Option<ProfileWithCompany>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{PROFILE_WITH_COMPANY} WHERE p.id = $1");
        let profile = sqlx::query_as::<_, ProfileWithCompany>(&sql)
            .bind(user_id)
            .fetch_optional(executor)
            .await?;
        Ok(profile)
    }

    /// Empresa do perfil; `None` se o usuário ainda não tem perfil.
    pub async fn company_of(&self, user_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let company_id: Option<Uuid> =
            sqlx::query_scalar("SELECT company_id FROM profiles WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(company_id)
    }

    // ---
    // Criação
    // ---

    /// Chama o procedimento remoto. Perfil duplicado sobe como violação de unicidade.
    pub async fn call_create_profile_rpc<'e, E>(
        &self,
        executor: E,
        data: &ProfileProvisioning<'_>,
    ) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id: Uuid = sqlx::query_scalar(
            "SELECT create_profile_for_user($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(data.user_id)
        .bind(data.email)
        .bind(data.full_name)
        .bind(data.cpf)
        .bind(data.role)
        .bind(data.company_code)
        .bind(data.phone)
        .bind(data.fallback_company_name)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    /// Inserção direta (último recurso quando o procedimento falha).
    pub async fn insert_profile<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        full_name: &str,
        cpf: &str,
        role: UserRole,
        company_id: Uuid,
        phone: Option<&str>,
    ) -> Result<Profile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, full_name, cpf, role, company_id, phone, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, true)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(full_name)
        .bind(cpf)
        .bind(role)
        .bind(company_id)
        .bind(phone)
        .fetch_one(executor)
        .await?;
        Ok(profile)
    }

    // ---
    // Atualização e estatísticas
    // ---

    pub async fn update_profile<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        payload: &UpdateProfilePayload,
    ) -> Result<Option<ProfileWithCompany>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // CASE por coluna: $2/$4/$6 dizem se o campo veio no corpo
        let sql = r#"
            WITH p AS (
                UPDATE profiles SET
                    full_name = CASE WHEN $2 THEN $3 ELSE full_name END,
                    phone = CASE WHEN $4 THEN $5 ELSE phone END,
                    avatar_url = CASE WHEN $6 THEN $7 ELSE avatar_url END,
                    updated_at = now()
                WHERE id = $1
                RETURNING *
            )
            SELECT p.*,
                   CASE WHEN co.id IS NULL THEN NULL ELSE to_jsonb(co) END AS company
            FROM p
            LEFT JOIN companies co ON co.id = p.company_id
        "#;

        let profile = sqlx::query_as::<_, ProfileWithCompany>(sql)
            .bind(user_id)
            .bind(payload.full_name.is_some())
            .bind(payload.full_name.as_deref())
            .bind(payload.phone.is_some())
            .bind(payload.phone.clone().flatten())
            .bind(payload.avatar_url.is_some())
            .bind(payload.avatar_url.clone().flatten())
            .fetch_optional(executor)
            .await?;
        Ok(profile)
    }

    /// Ferramentas `em_uso` com o usuário e devoluções registradas por ele.
    pub async fn stats<'e, E>(&self, executor: E, user_id: Uuid) -> Result<UserStats, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (tools_in_use, total_returns): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM tools
                  WHERE assigned_to = $1 AND status = 'em_uso') AS tools_in_use,
                (SELECT COUNT(*) FROM tool_movements
                  WHERE user_id = $1 AND action = 'devolvido') AS total_returns
            "#,
        )
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        Ok(UserStats {
            tools_in_use,
            total_returns,
        })
    }
}
