// src/client.rs

//! Cliente HTTP tipado da API, usado pelo app móvel.
//!
//! Cada operação devolve um [`Outcome`] (`{data, error}`): falhas viram uma
//! mensagem legível e nunca escapam como erro para a tela.

use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    auth::{AuthResponse, Landing, Session, SessionInfo, SignInPayload, SignUpPayload},
    dashboard::DashboardStats,
    movement::Activity,
    profile::{ProfileWithCompany, UpdateProfilePayload, UserStats},
    tool::{
        AssignToolPayload, CreateToolPayload, MaintenancePayload, ReturnToolPayload, ToolChanges,
        ToolDetails, ToolQuery, ToolWithRelations,
    },
};

pub mod activities;
pub mod dashboard;
pub mod profile;
pub mod session;
pub mod tools;

pub use activities::ActivitiesView;
pub use dashboard::DashboardView;
pub use profile::ProfileView;
pub use session::{SessionState, SessionStore};
pub use tools::{ToolsOptions, ToolsView};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Falha de comunicação com o servidor: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },
}

/// Resultado de uma operação do cliente: `data` em caso de sucesso,
/// `error` com a mensagem legível em caso de falha.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Outcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl<T> From<Result<T, ClientError>> for Outcome<T> {
    fn from(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(data) => Outcome::ok(data),
            Err(e) => Outcome::err(e.to_string()),
        }
    }
}

// Corpo de erro da API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct CanteiroClient {
    base_url: String,
    http: reqwest::Client,
    session: SessionStore,
}

impl CanteiroClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_session(base_url, SessionStore::new())
    }

    /// Usa uma sessão já existente (ex.: restaurada do armazenamento do aparelho).
    pub fn with_session(base_url: impl Into<String>, session: SessionStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, self.url(path));
        match self.session.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = check(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ClientError> {
        check(request.send().await?).await?;
        Ok(())
    }

    // ---
    // Sessão
    // ---

    /// Lê a sessão atual uma única vez e marca a sessão como inicializada.
    /// Devolve a rota de entrada (`/` ou `/welcome`).
    pub async fn initialize(&self) -> Landing {
        if self.session.splash_hidden() {
            return self.session.landing();
        }

        let session = match self
            .send_json::<SessionInfo>(self.request(Method::GET, "/api/auth/session"))
            .await
        {
            Ok(info) => info.session,
            Err(e) => {
                tracing::warn!("⚠️ Não foi possível ler a sessão atual: {}", e);
                None
            }
        };

        self.session.mark_initialized(session);
        self.session.landing()
    }

    pub async fn sign_up(&self, payload: &SignUpPayload) -> Outcome<Session> {
        let result = self
            .send_json::<AuthResponse>(self.request(Method::POST, "/api/auth/sign-up").json(payload))
            .await;
        self.store_session(result)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Outcome<Session> {
        let payload = SignInPayload {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self
            .send_json::<AuthResponse>(self.request(Method::POST, "/api/auth/sign-in").json(&payload))
            .await;
        self.store_session(result)
    }

    /// Encerra a sessão. A sessão local é limpa mesmo se o servidor falhar;
    /// a falha só é registrada no log.
    pub async fn sign_out(&self) {
        if let Err(e) = self
            .send_empty(self.request(Method::POST, "/api/auth/sign-out"))
            .await
        {
            tracing::warn!("⚠️ Falha ao encerrar a sessão no servidor: {}", e);
        }
        self.session.set_session(None);
    }

    fn store_session(&self, result: Result<AuthResponse, ClientError>) -> Outcome<Session> {
        match result {
            Ok(response) => {
                self.session.set_session(Some(response.session.clone()));
                Outcome::ok(response.session)
            }
            Err(e) => Outcome::err(e.to_string()),
        }
    }

    // ---
    // Ferramentas
    // ---

    pub async fn fetch_tools(&self, query: &ToolQuery) -> Result<Vec<ToolWithRelations>, ClientError> {
        self.send_json(self.request(Method::GET, "/api/tools").query(query))
            .await
    }

    pub async fn tool_details(&self, tool_id: Uuid) -> Result<ToolDetails, ClientError> {
        self.send_json(self.request(Method::GET, &format!("/api/tools/{tool_id}")))
            .await
    }

    pub async fn create_tool(&self, payload: &CreateToolPayload) -> Result<ToolWithRelations, ClientError> {
        self.send_json(self.request(Method::POST, "/api/tools").json(payload))
            .await
    }

    pub async fn update_tool(
        &self,
        tool_id: Uuid,
        changes: &ToolChanges,
    ) -> Result<ToolWithRelations, ClientError> {
        self.send_json(
            self.request(Method::PATCH, &format!("/api/tools/{tool_id}"))
                .json(changes),
        )
        .await
    }

    pub async fn delete_tool(&self, tool_id: Uuid) -> Result<(), ClientError> {
        self.send_empty(self.request(Method::DELETE, &format!("/api/tools/{tool_id}")))
            .await
    }

    pub async fn assign_tool(
        &self,
        tool_id: Uuid,
        payload: &AssignToolPayload,
    ) -> Result<ToolWithRelations, ClientError> {
        self.send_json(
            self.request(Method::POST, &format!("/api/tools/{tool_id}/assign"))
                .json(payload),
        )
        .await
    }

    pub async fn return_tool(
        &self,
        tool_id: Uuid,
        payload: &ReturnToolPayload,
    ) -> Result<ToolWithRelations, ClientError> {
        self.send_json(
            self.request(Method::POST, &format!("/api/tools/{tool_id}/return"))
                .json(payload),
        )
        .await
    }

    pub async fn send_to_maintenance(
        &self,
        tool_id: Uuid,
        payload: &MaintenancePayload,
    ) -> Result<ToolWithRelations, ClientError> {
        self.send_json(
            self.request(Method::POST, &format!("/api/tools/{tool_id}/maintenance"))
                .json(payload),
        )
        .await
    }

    pub async fn return_from_maintenance(
        &self,
        tool_id: Uuid,
        payload: &ReturnToolPayload,
    ) -> Result<ToolWithRelations, ClientError> {
        self.send_json(
            self.request(
                Method::POST,
                &format!("/api/tools/{tool_id}/maintenance/return"),
            )
            .json(payload),
        )
        .await
    }

    // ---
    // Atividades, painel e perfil
    // ---

    pub async fn fetch_activities(&self) -> Result<Vec<Activity>, ClientError> {
        self.send_json(self.request(Method::GET, "/api/activities"))
            .await
    }

    pub async fn fetch_dashboard(&self) -> Result<DashboardStats, ClientError> {
        self.send_json(self.request(Method::GET, "/api/dashboard"))
            .await
    }

    pub async fn fetch_profile(&self) -> Result<ProfileWithCompany, ClientError> {
        self.send_json(self.request(Method::GET, "/api/profile"))
            .await
    }

    pub async fn update_profile(
        &self,
        payload: &UpdateProfilePayload,
    ) -> Result<ProfileWithCompany, ClientError> {
        self.send_json(self.request(Method::PATCH, "/api/profile").json(payload))
            .await
    }

    pub async fn user_stats(&self) -> Result<UserStats, ClientError> {
        self.send_json(self.request(Method::GET, "/api/profile/stats"))
            .await
    }
}

// Status fora de 2xx vira `ClientError::Api` com a mensagem do corpo
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Erro desconhecido")
            .to_string(),
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_from_result() {
        let ok: Outcome<u8> = Ok::<_, ClientError>(7).into();
        assert_eq!(ok, Outcome::ok(7));
        assert!(ok.is_ok());

        let err: Outcome<u8> = Err(ClientError::Api {
            status: 409,
            message: "Transição inválida".into(),
        })
        .into();
        assert_eq!(err.data, None);
        assert_eq!(err.error.as_deref(), Some("Transição inválida"));
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let client = CanteiroClient::new("http://localhost:3000/");
        assert_eq!(client.url("/api/tools"), "http://localhost:3000/api/tools");
    }

    #[test]
    fn outcome_serializes_as_data_error_pair() {
        let json = serde_json::to_value(Outcome::<u8>::err("falhou")).unwrap();
        assert_eq!(json, serde_json::json!({ "data": null, "error": "falhou" }));
    }
}
