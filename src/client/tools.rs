// src/client/tools.rs

use uuid::Uuid;

use crate::client::{CanteiroClient, ClientError, Outcome};
use crate::models::tool::{
    AssignToolPayload, CreateToolPayload, MaintenancePayload, ReturnToolPayload, ToolChanges,
    ToolQuery, ToolWithRelations,
};

/// Filtros da listagem: status exato ou "all", busca e limite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolsOptions {
    pub status: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

impl ToolsOptions {
    fn query(&self) -> ToolQuery {
        ToolQuery {
            status: self.status.clone(),
            search: self.search.clone(),
            limit: self.limit,
        }
    }
}

/// Lista de ferramentas em memória, sincronizada só por `fetch`/`refresh`
/// e pelas próprias mutações.
pub struct ToolsView {
    client: CanteiroClient,
    options: ToolsOptions,
    pub tools: Vec<ToolWithRelations>,
    pub error: Option<String>,
    pub loading: bool,
    pub refreshing: bool,
}

impl ToolsView {
    pub fn new(client: CanteiroClient, options: ToolsOptions) -> Self {
        Self {
            client,
            options,
            tools: Vec::new(),
            error: None,
            loading: true,
            refreshing: false,
        }
    }

    pub fn options(&self) -> &ToolsOptions {
        &self.options
    }

    /// Troca os filtros e recarrega.
    pub async fn set_options(&mut self, options: ToolsOptions) -> Outcome<Vec<ToolWithRelations>> {
        self.options = options;
        self.fetch().await
    }

    pub async fn fetch(&mut self) -> Outcome<Vec<ToolWithRelations>> {
        self.error = None;
        let result = self.client.fetch_tools(&self.options.query()).await;
        self.loading = false;
        self.refreshing = false;

        match result {
            Ok(tools) => {
                self.tools = tools.clone();
                Outcome::ok(tools)
            }
            Err(e) => {
                tracing::error!("❌ Erro ao carregar ferramentas: {}", e);
                self.fail(e)
            }
        }
    }

    pub async fn refresh(&mut self) -> Outcome<Vec<ToolWithRelations>> {
        self.refreshing = true;
        self.fetch().await
    }

    pub async fn create(&mut self, payload: CreateToolPayload) -> Outcome<ToolWithRelations> {
        self.error = None;
        match self.client.create_tool(&payload).await {
            Ok(tool) => {
                prepend(&mut self.tools, tool.clone());
                Outcome::ok(tool)
            }
            Err(e) => self.fail(e),
        }
    }

    pub async fn update(&mut self, tool_id: Uuid, changes: ToolChanges) -> Outcome<ToolWithRelations> {
        self.error = None;
        let result = self.client.update_tool(tool_id, &changes).await;
        self.apply(result)
    }

    pub async fn delete(&mut self, tool_id: Uuid) -> Outcome<()> {
        self.error = None;
        match self.client.delete_tool(tool_id).await {
            Ok(()) => {
                remove_by_id(&mut self.tools, tool_id);
                Outcome::ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Empresta a ferramenta; sem `user_id`, o responsável é quem está logado.
    pub async fn assign(&mut self, tool_id: Uuid, user_id: Option<Uuid>) -> Outcome<ToolWithRelations> {
        self.error = None;
        let payload = AssignToolPayload {
            user_id,
            notes: None,
        };
        let result = self.client.assign_tool(tool_id, &payload).await;
        self.apply(result)
    }

    pub async fn return_tool(&mut self, tool_id: Uuid, location: Option<String>) -> Outcome<ToolWithRelations> {
        self.error = None;
        let payload = ReturnToolPayload {
            location,
            notes: None,
        };
        let result = self.client.return_tool(tool_id, &payload).await;
        self.apply(result)
    }

    /// Sem `location`, o servidor usa "Oficina de Manutenção".
    pub async fn send_to_maintenance(
        &mut self,
        tool_id: Uuid,
        location: Option<String>,
    ) -> Outcome<ToolWithRelations> {
        self.error = None;
        let payload = MaintenancePayload {
            location,
            notes: None,
        };
        let result = self.client.send_to_maintenance(tool_id, &payload).await;
        self.apply(result)
    }

    pub async fn return_from_maintenance(
        &mut self,
        tool_id: Uuid,
        location: Option<String>,
    ) -> Outcome<ToolWithRelations> {
        self.error = None;
        let payload = ReturnToolPayload {
            location,
            notes: None,
        };
        let result = self.client.return_from_maintenance(tool_id, &payload).await;
        self.apply(result)
    }

    // Resposta de uma mutação: substitui a ferramenta na lista
    fn apply(&mut self, result: Result<ToolWithRelations, ClientError>) -> Outcome<ToolWithRelations> {
        match result {
            Ok(tool) => {
                replace_by_id(&mut self.tools, tool.clone());
                Outcome::ok(tool)
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail<T>(&mut self, e: ClientError) -> Outcome<T> {
        let message = e.to_string();
        self.error = Some(message.clone());
        Outcome::err(message)
    }
}

// ---
// Operações sobre a lista em memória
// ---

pub(crate) fn prepend(tools: &mut Vec<ToolWithRelations>, tool: ToolWithRelations) {
    tools.insert(0, tool);
}

pub(crate) fn replace_by_id(tools: &mut [ToolWithRelations], updated: ToolWithRelations) {
    if let Some(slot) = tools.iter_mut().find(|t| t.tool.id == updated.tool.id) {
        *slot = updated;
    }
}

pub(crate) fn remove_by_id(tools: &mut Vec<ToolWithRelations>, tool_id: Uuid) {
    tools.retain(|t| t.tool.id != tool_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movement::fixtures;
    use crate::models::tool::ToolStatus;

    fn with_relations(id: Uuid, status: ToolStatus) -> ToolWithRelations {
        ToolWithRelations {
            tool: fixtures::tool(id, status),
            category: None,
            assigned_user: None,
            company: None,
        }
    }

    #[test]
    fn create_prepends_newest() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut tools = vec![with_relations(a, ToolStatus::Disponivel)];

        prepend(&mut tools, with_relations(b, ToolStatus::Disponivel));

        let ids: Vec<Uuid> = tools.iter().map(|t| t.tool.id).collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn update_replaces_in_place() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut tools = vec![
            with_relations(a, ToolStatus::Disponivel),
            with_relations(b, ToolStatus::Disponivel),
        ];

        replace_by_id(&mut tools, with_relations(b, ToolStatus::EmUso));

        assert_eq!(tools.len(), 2);
        assert_eq!(tools[1].tool.status, ToolStatus::EmUso);
        assert_eq!(tools[0].tool.status, ToolStatus::Disponivel);
    }

    #[test]
    fn update_of_unknown_tool_leaves_list_untouched() {
        let a = Uuid::new_v4();
        let mut tools = vec![with_relations(a, ToolStatus::Disponivel)];

        replace_by_id(&mut tools, with_relations(Uuid::new_v4(), ToolStatus::EmUso));

        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].tool.status, ToolStatus::Disponivel);
    }

    #[test]
    fn delete_removes_by_id() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut tools = vec![
            with_relations(a, ToolStatus::Disponivel),
            with_relations(b, ToolStatus::Manutencao),
        ];

        remove_by_id(&mut tools, a);

        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].tool.id, b);
    }

    #[test]
    fn options_become_query() {
        let options = ToolsOptions {
            status: Some("manutencao".into()),
            search: Some("furadeira".into()),
            limit: Some(20),
        };
        let view = ToolsView::new(CanteiroClient::new("http://localhost:3000"), options);

        let query = view.options().query();
        assert_eq!(query.status.as_deref(), Some("manutencao"));
        assert_eq!(query.search_pattern().as_deref(), Some("%furadeira%"));
        assert_eq!(query.limit(), Some(20));
        assert!(view.loading);
    }
}
