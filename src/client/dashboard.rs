// src/client/dashboard.rs

use crate::client::{CanteiroClient, Outcome};
use crate::models::dashboard::DashboardStats;

/// Painel inicial: contadores e movimentações recentes.
pub struct DashboardView {
    client: CanteiroClient,
    pub stats: Option<DashboardStats>,
    pub error: Option<String>,
    pub loading: bool,
    pub refreshing: bool,
}

impl DashboardView {
    pub fn new(client: CanteiroClient) -> Self {
        Self {
            client,
            stats: None,
            error: None,
            loading: true,
            refreshing: false,
        }
    }

    pub async fn fetch(&mut self) -> Outcome<DashboardStats> {
        self.error = None;
        let result = self.client.fetch_dashboard().await;
        self.loading = false;
        self.refreshing = false;

        match result {
            Ok(stats) => {
                self.stats = Some(stats.clone());
                Outcome::ok(stats)
            }
            Err(e) => {
                tracing::error!("❌ Erro ao carregar dados do painel: {}", e);
                let message = e.to_string();
                self.error = Some(message.clone());
                Outcome::err(message)
            }
        }
    }

    pub async fn refresh(&mut self) -> Outcome<DashboardStats> {
        self.refreshing = true;
        self.fetch().await
    }
}
