// src/services/profile_service.rs

use sqlx::{Acquire, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProfileRepository,
    models::profile::{ProfileWithCompany, UpdateProfilePayload, UserStats},
};

#[derive(Clone)]
pub struct ProfileService {
    profile_repo: ProfileRepository,
    pool: PgPool,
}

impl ProfileService {
    pub fn new(profile_repo: ProfileRepository, pool: PgPool) -> Self {
        Self { profile_repo, pool }
    }

    /// Empresa do usuário, usada pelo `company_guard`.
    pub async fn company_of(&self, user_id: Uuid) -> Result<Option<Uuid>, AppError> {
        self.profile_repo.company_of(user_id).await
    }

    pub async fn fetch_profile(&self, user_id: Uuid) -> Result<ProfileWithCompany, AppError> {
        self.profile_repo
            .find_with_company(&self.pool, user_id)
            .await?
            .ok_or(AppError::ProfileNotFound)
    }

    /// Atualiza o próprio perfil. Corpo vazio devolve o perfil atual.
    pub async fn update_profile<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        payload: &UpdateProfilePayload,
    ) -> Result<ProfileWithCompany, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let profile = if payload.is_empty() {
            self.profile_repo.find_with_company(&mut *tx, user_id).await?
        } else {
            self.profile_repo
                .update_profile(&mut *tx, user_id, payload)
                .await?
        }
        .ok_or(AppError::ProfileNotFound)?;

        tx.commit().await?;
        Ok(profile)
    }

    pub async fn user_stats<'e, E>(&self, executor: E, user_id: Uuid) -> Result<UserStats, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.profile_repo.stats(executor, user_id).await
    }
}
