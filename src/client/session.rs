// src/client/session.rs

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::auth::{Landing, Session};

/// Estado publicado a cada mudança: `(initialized, session)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub initialized: bool,
    pub session: Option<Session>,
}

impl SessionState {
    pub fn landing(&self) -> Landing {
        Landing::for_session(self.session.as_ref())
    }
}

/// Sessão do app. Criada ao iniciar o processo, limpa no logout.
///
/// Quem precisa reagir (navegação, splash) assina com [`SessionStore::subscribe`].
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<SessionState>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        Self { tx: Arc::new(tx) }
    }

    /// Sessão persistida no aparelho; ainda precisa de `initialize()`.
    pub fn restored(session: Session) -> Self {
        let store = Self::new();
        store.tx.send_modify(|state| state.session = Some(session));
        store
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.tx.borrow().session.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.tx
            .borrow()
            .session
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    pub fn landing(&self) -> Landing {
        self.tx.borrow().landing()
    }

    /// O splash some assim que a inicialização termina.
    pub fn splash_hidden(&self) -> bool {
        self.tx.borrow().initialized
    }

    pub(crate) fn mark_initialized(&self, session: Option<Session>) {
        self.tx.send_replace(SessionState {
            initialized: true,
            session,
        });
    }

    pub(crate) fn set_session(&self, session: Option<Session>) {
        self.tx.send_modify(|state| state.session = session);
    }
}
