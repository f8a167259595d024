// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    common::i18n::I18nStore,
    db::{
        ActivityRepository, CompanyRepository, DashboardRepository, MaintenanceRepository,
        NotificationRepository, ProfileRepository, ToolRepository, UserRepository,
    },
    services::{
        activity_service::ActivityService, auth::AuthService, dashboard_service::DashboardService,
        label_service::LabelService, maintenance_service::MaintenanceService,
        notification_service::NotificationService, profile_service::ProfileService,
        tool_service::ToolService,
    },
};

/// Empresa usada quando nem o código nem o nome padrão resolvem.
pub const FALLBACK_COMPANY_ID: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440000);

/// Configurações lidas do ambiente (`.env` incluso).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub session_ttl_days: i64,
    /// Espera antes de checar de novo se o gatilho criou o perfil.
    pub profile_trigger_wait: Duration,
    pub default_company_name: String,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
            session_ttl_days: parse_var("SESSION_TTL_DAYS", 7)?,
            profile_trigger_wait: Duration::from_millis(parse_var("PROFILE_TRIGGER_WAIT_MS", 1000)?),
            default_company_name: env::var("DEFAULT_COMPANY_NAME")
                .unwrap_or_else(|_| "Construtora ABC Ltda".to_string()),
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{name} deve ser um número válido")),
        Err(_) => Ok(default),
    }
}

// O estado compartilhado, acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Arc<Settings>,
    pub i18n_store: Arc<I18nStore>,
    pub auth_service: AuthService,
    pub profile_service: ProfileService,
    pub tool_service: ToolService,
    pub activity_service: ActivityService,
    pub dashboard_service: DashboardService,
    pub maintenance_service: MaintenanceService,
    pub notification_service: NotificationService,
    pub label_service: LabelService,
}

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, settings))
    }

    /// Monta o grafo de dependências sobre um pool já criado.
    pub fn from_pool(db_pool: PgPool, settings: Settings) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let profile_repo = ProfileRepository::new(db_pool.clone());
        let company_repo = CompanyRepository::new(db_pool.clone());
        let tool_repo = ToolRepository::new(db_pool.clone());
        let activity_repo = ActivityRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());
        let maintenance_repo = MaintenanceRepository::new(db_pool.clone());
        let notification_repo = NotificationRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo,
            profile_repo.clone(),
            company_repo,
            &settings,
            db_pool.clone(),
        );
        let profile_service = ProfileService::new(profile_repo, db_pool.clone());
        let tool_service =
            ToolService::new(tool_repo, activity_repo.clone(), maintenance_repo.clone());
        let activity_service = ActivityService::new(activity_repo.clone());
        let dashboard_service = DashboardService::new(dashboard_repo, activity_repo);
        let maintenance_service = MaintenanceService::new(maintenance_repo);

        Self {
            db_pool,
            settings: Arc::new(settings),
            i18n_store: Arc::new(I18nStore::default()),
            auth_service,
            profile_service,
            tool_service,
            activity_service,
            dashboard_service,
            maintenance_service,
            notification_service: NotificationService::new(notification_repo),
            label_service: LabelService::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_company_id_matches_seed() {
        assert_eq!(
            FALLBACK_COMPANY_ID.to_string(),
            "550e8400-e29b-41d4-a716-446655440000"
        );
    }
}
