// src/db/maintenance_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::maintenance::{CreateMaintenancePayload, MaintenanceRecord, MaintenanceStatus},
};

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Histórico de manutenção da ferramenta, mais recente primeiro.
    pub async fn list_for_tool<'e, E>(
        &self,
        executor: E,
        tool_id: Uuid,
    ) -> Result<Vec<MaintenanceRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            SELECT * FROM maintenance_records
            WHERE tool_id = $1
            ORDER BY start_date DESC, created_at DESC
            "#,
        )
        .bind(tool_id)
        .fetch_all(executor)
        .await?;
        Ok(records)
    }

    pub async fn create_record<'e, E>(
        &self,
        executor: E,
        tool_id: Uuid,
        created_by: Uuid,
        payload: &CreateMaintenancePayload,
    ) -> Result<MaintenanceRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            INSERT INTO maintenance_records (
                tool_id, type, description, cost, technician_name, company_service,
                start_date, end_date, status, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(tool_id)
        .bind(payload.kind)
        .bind(&payload.description)
        .bind(payload.cost)
        .bind(&payload.technician_name)
        .bind(&payload.company_service)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.status.unwrap_or(MaintenanceStatus::Agendada))
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(record)
    }
}
