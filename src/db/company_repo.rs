// src/db/company_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{common::error::AppError, models::company::Company};

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Empresa ativa pelo código, comparado em maiúsculas.
    pub async fn find_active_by_code<'e, E>(
        &self,
        executor: E,
        code: &str,
    ) -> Result<Option<Company>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let company = sqlx::query_as::<_, Company>(
            "SELECT * FROM companies WHERE code = upper($1) AND is_active = true",
        )
        .bind(code)
        .fetch_optional(executor)
        .await?;
        Ok(company)
    }

    pub async fn find_by_name<'e, E>(
        &self,
        executor: E,
        name: &str,
    ) -> Result<Option<Company>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let company = sqlx::query_as::<_, Company>(
            "SELECT * FROM companies WHERE name = $1 ORDER BY created_at ASC LIMIT 1",
        )
        .bind(name)
        .fetch_optional(executor)
        .await?;
        Ok(company)
    }
}
