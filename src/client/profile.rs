// src/client/profile.rs

use crate::client::{CanteiroClient, Outcome};
use crate::models::profile::{ProfileWithCompany, UpdateProfilePayload, UserStats};

pub struct ProfileView {
    client: CanteiroClient,
    pub profile: Option<ProfileWithCompany>,
    pub error: Option<String>,
    pub loading: bool,
}

impl ProfileView {
    pub fn new(client: CanteiroClient) -> Self {
        Self {
            client,
            profile: None,
            error: None,
            loading: true,
        }
    }

    /// Sem sessão, o perfil fica vazio e não há erro.
    pub async fn fetch(&mut self) -> Outcome<Option<ProfileWithCompany>> {
        if self.client.session().session().is_none() {
            self.profile = None;
            self.loading = false;
            return Outcome::ok(None);
        }

        self.error = None;
        let result = self.client.fetch_profile().await;
        self.loading = false;

        match result {
            Ok(profile) => {
                self.profile = Some(profile.clone());
                Outcome::ok(Some(profile))
            }
            Err(e) => {
                tracing::error!("❌ Erro ao carregar perfil: {}", e);
                let message = e.to_string();
                self.error = Some(message.clone());
                Outcome::err(message)
            }
        }
    }

    pub async fn refresh(&mut self) -> Outcome<Option<ProfileWithCompany>> {
        self.fetch().await
    }

    pub async fn update(&mut self, payload: UpdateProfilePayload) -> Outcome<ProfileWithCompany> {
        if self.client.session().session().is_none() {
            return Outcome::err("Usuário não autenticado");
        }

        self.error = None;
        match self.client.update_profile(&payload).await {
            Ok(profile) => {
                self.profile = Some(profile.clone());
                Outcome::ok(profile)
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(message.clone());
                Outcome::err(message)
            }
        }
    }

    /// Contadores do usuário; qualquer falha (ou ausência de sessão) vira zero.
    pub async fn user_stats(&self) -> UserStats {
        if self.client.session().session().is_none() {
            return UserStats::default();
        }

        match self.client.user_stats().await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::error!("❌ Erro ao carregar estatísticas do usuário: {}", e);
                UserStats::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn without_session_profile_is_empty_and_stats_are_zero() {
        let mut view = ProfileView::new(CanteiroClient::new("http://127.0.0.1:9"));

        let outcome = view.fetch().await;
        assert!(matches!(outcome.data, Some(None)));
        assert!(outcome.error.is_none());
        assert!(!view.loading);

        assert_eq!(view.user_stats().await, UserStats::default());

        let updated = view.update(UpdateProfilePayload::default()).await;
        assert_eq!(updated.error.as_deref(), Some("Usuário não autenticado"));
    }
}
