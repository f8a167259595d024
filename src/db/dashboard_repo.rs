// src/db/dashboard_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::tool::ToolStatus};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Status de todas as ferramentas da empresa; a contagem é feita no serviço
    pub async fn tool_statuses<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
    ) -> Result<Vec<ToolStatus>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let statuses: Vec<ToolStatus> =
            sqlx::query_scalar("SELECT status FROM tools WHERE company_id = $1")
                .bind(company_id)
                .fetch_all(executor)
                .await?;
        Ok(statuses)
    }
}
