// src/services/maintenance_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::MaintenanceRepository,
    models::maintenance::{CreateMaintenancePayload, MaintenanceRecord},
};

#[derive(Clone)]
pub struct MaintenanceService {
    maintenance_repo: MaintenanceRepository,
}

impl MaintenanceService {
    pub fn new(maintenance_repo: MaintenanceRepository) -> Self {
        Self { maintenance_repo }
    }

    // A ferramenta precisa ser visível para a empresa
    async fn ensure_tool(
        conn: &mut sqlx::PgConnection,
        company_id: Uuid,
        tool_id: Uuid,
    ) -> Result<(), AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM tools WHERE id = $1 AND company_id = $2)",
        )
        .bind(tool_id)
        .bind(company_id)
        .fetch_one(conn)
        .await?;

        if exists {
            Ok(())
        } else {
            Err(AppError::ToolNotFound)
        }
    }

    pub async fn list_records<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        tool_id: Uuid,
    ) -> Result<Vec<MaintenanceRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        Self::ensure_tool(&mut *conn, company_id, tool_id).await?;
        self.maintenance_repo.list_for_tool(&mut *conn, tool_id).await
    }

    pub async fn create_record<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        created_by: Uuid,
        tool_id: Uuid,
        payload: &CreateMaintenancePayload,
    ) -> Result<MaintenanceRecord, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        payload.validate()?;

        let mut tx = executor.begin().await?;
        Self::ensure_tool(&mut *tx, company_id, tool_id).await?;
        let record = self
            .maintenance_repo
            .create_record(&mut *tx, tool_id, created_by, payload)
            .await?;
        tx.commit().await?;

        tracing::info!(
            "🛠️ Manutenção {:?} registrada para a ferramenta {}",
            record.kind,
            tool_id
        );
        Ok(record)
    }
}
