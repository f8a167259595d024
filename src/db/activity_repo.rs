// src/db/activity_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::movement::{MovementWithRelations, NewMovement, ToolMovement},
};

// Movimentações com ferramenta, autor e responsáveis expandidos.
// Linhas cuja ferramenta não é visível para a empresa ficam de fora;
// referências que não resolvem chegam como NULL e são filtradas no serviço.
const RECENT_MOVEMENTS: &str = r#"
    SELECT m.*,
           CASE WHEN t.id IS NULL THEN NULL ELSE to_jsonb(t) END AS tool,
           CASE WHEN u.id IS NULL THEN NULL ELSE to_jsonb(u) END AS "user",
           CASE WHEN pa.id IS NULL THEN NULL ELSE to_jsonb(pa) END AS previous_assigned_user,
           CASE WHEN na.id IS NULL THEN NULL ELSE to_jsonb(na) END AS new_assigned_user
    FROM tool_movements m
    LEFT JOIN tools t ON t.id = m.tool_id
    LEFT JOIN profiles u ON u.id = m.user_id
    LEFT JOIN profiles pa ON pa.id = m.previous_assigned_to
    LEFT JOIN profiles na ON na.id = m.new_assigned_to
    WHERE t.id IS NULL OR t.company_id = $1
    ORDER BY m.created_at DESC
    LIMIT $2
"#;

#[derive(Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registra uma linha no histórico (somente inserção).
    pub async fn record_movement<'e, E>(
        &self,
        executor: E,
        movement: &NewMovement,
    ) -> Result<ToolMovement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, ToolMovement>(
            r#"
            INSERT INTO tool_movements (
                tool_id, user_id, action, previous_status, new_status,
                previous_location, new_location, previous_assigned_to, new_assigned_to, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(movement.tool_id)
        .bind(movement.user_id)
        .bind(movement.action)
        .bind(&movement.previous_status)
        .bind(&movement.new_status)
        .bind(&movement.previous_location)
        .bind(&movement.new_location)
        .bind(movement.previous_assigned_to)
        .bind(movement.new_assigned_to)
        .bind(&movement.notes)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    /// As `limit` movimentações mais recentes, ainda sem filtrar órfãs.
    pub async fn list_recent<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MovementWithRelations>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, MovementWithRelations>(RECENT_MOVEMENTS)
            .bind(company_id)
            .bind(limit)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }
}
