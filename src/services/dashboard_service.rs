// src/services/dashboard_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ActivityRepository, DashboardRepository},
    models::{
        dashboard::{DashboardStats, StatusCounts, RECENT_ACTIVITY_LIMIT},
        movement::valid_activities,
    },
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    activity_repo: ActivityRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository, activity_repo: ActivityRepository) -> Self {
        Self {
            repo,
            activity_repo,
        }
    }

    /// Contadores por status + movimentações recentes, na mesma transação.
    pub async fn get_dashboard<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
    ) -> Result<DashboardStats, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Snapshot consistente das duas leituras
        let mut tx = executor.begin().await?;

        let statuses = self.repo.tool_statuses(&mut *tx, company_id).await?;
        let recent = self
            .activity_repo
            .list_recent(&mut *tx, company_id, RECENT_ACTIVITY_LIMIT)
            .await?;

        tx.commit().await?;

        Ok(DashboardStats {
            counts: StatusCounts::from_statuses(statuses),
            recent_activities: valid_activities(recent),
        })
    }
}
