// src/services/activity_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ActivityRepository,
    models::movement::{valid_activities, Activity},
};

/// Máximo de movimentações lidas para o feed.
pub const ACTIVITY_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct ActivityService {
    activity_repo: ActivityRepository,
}

impl ActivityService {
    pub fn new(activity_repo: ActivityRepository) -> Self {
        Self { activity_repo }
    }

    /// Feed mais recente primeiro; linhas sem ferramenta ou autor são descartadas.
    pub async fn fetch_activities<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
    ) -> Result<Vec<Activity>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = self
            .activity_repo
            .list_recent(executor, company_id, ACTIVITY_LIMIT)
            .await?;

        let total = rows.len();
        let activities = valid_activities(rows);
        if activities.len() < total {
            tracing::debug!(
                "Descartadas {} movimentações órfãs",
                total - activities.len()
            );
        }
        Ok(activities)
    }
}
