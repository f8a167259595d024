// src/services/notification_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, db::NotificationRepository, models::notification::Notification};

#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
}

impl NotificationService {
    pub fn new(repo: NotificationRepository) -> Self {
        Self { repo }
    }

    pub async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, AppError> {
        self.repo.list_for_user(user_id).await
    }

    pub async fn mark_read<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        notification_id: Uuid,
    ) -> Result<Notification, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .mark_read(executor, user_id, notification_id)
            .await?
            .ok_or(AppError::NotificationNotFound)
    }
}
