// src/services/tool_service.rs

use chrono::{DateTime, Utc};
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{tool_repo::ToolListFilter, ActivityRepository, MaintenanceRepository, ToolRepository},
    models::{
        movement::{MovementAction, NewMovement},
        tool::{
            AssignToolPayload, CreateCategoryPayload, CreateToolPayload, MaintenancePayload,
            NewTool, ReturnToolPayload, StatusFilter, Tool, ToolAction, ToolCategory, ToolChanges,
            ToolDetails, ToolQuery, ToolWithRelations, DEFAULT_MAINTENANCE_LOCATION,
        },
    },
};

/// Dados opcionais de uma ação do ciclo de vida.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionRequest {
    /// Só para `assign`: quem recebe a ferramenta.
    pub assignee: Option<Uuid>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// O que uma ação grava: a atualização da ferramenta e a linha de histórico.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub changes: ToolChanges,
    pub movement: NewMovement,
}

fn movement_action(action: ToolAction) -> MovementAction {
    match action {
        ToolAction::Assign => MovementAction::Emprestado,
        ToolAction::Return => MovementAction::Devolvido,
        ToolAction::SendToMaintenance => MovementAction::ManutencaoEnviado,
        ToolAction::ReturnFromMaintenance => MovementAction::ManutencaoRetornado,
    }
}

/// Calcula a transição sem tocar no banco.
///
/// Só `assign` deixa a ferramenta com responsável; as demais ações limpam
/// `assigned_to` e `assigned_at`.
pub fn plan_transition(
    tool: &Tool,
    action: ToolAction,
    actor: Uuid,
    request: &ActionRequest,
    now: DateTime<Utc>,
) -> Result<TransitionPlan, AppError> {
    let new_status = tool
        .status
        .next(action)
        .ok_or_else(|| AppError::InvalidTransition {
            from: tool.status.as_str().to_string(),
            action: action.as_str().to_string(),
        })?;

    let new_location = match action {
        ToolAction::Assign => None,
        ToolAction::SendToMaintenance => Some(
            request
                .location
                .clone()
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MAINTENANCE_LOCATION.to_string()),
        ),
        ToolAction::Return | ToolAction::ReturnFromMaintenance => request
            .location
            .clone()
            .filter(|l| !l.trim().is_empty()),
    };

    let new_assignee = match action {
        ToolAction::Assign => Some(request.assignee.unwrap_or(actor)),
        _ => None,
    };

    let changes = ToolChanges {
        status: Some(new_status),
        location: new_location.clone(),
        assigned_to: Some(new_assignee),
        assigned_at: Some(new_assignee.map(|_| now)),
        ..Default::default()
    };

    let movement = NewMovement {
        tool_id: tool.id,
        user_id: actor,
        action: movement_action(action),
        previous_status: Some(tool.status.as_str().to_string()),
        new_status: new_status.as_str().to_string(),
        previous_location: Some(tool.location.clone()),
        new_location: Some(new_location.unwrap_or_else(|| tool.location.clone())),
        previous_assigned_to: tool.assigned_to,
        new_assigned_to: new_assignee,
        notes: request.notes.clone(),
    };

    Ok(TransitionPlan { changes, movement })
}

#[derive(Clone)]
pub struct ToolService {
    tool_repo: ToolRepository,
    activity_repo: ActivityRepository,
    maintenance_repo: MaintenanceRepository,
}

impl ToolService {
    pub fn new(
        tool_repo: ToolRepository,
        activity_repo: ActivityRepository,
        maintenance_repo: MaintenanceRepository,
    ) -> Self {
        Self {
            tool_repo,
            activity_repo,
            maintenance_repo,
        }
    }

    // ---
    // Leitura
    // ---

    pub async fn fetch_tools<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        query: &ToolQuery,
    ) -> Result<Vec<ToolWithRelations>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        query.validate()?;

        let filter = ToolListFilter {
            status: query.status_filter().unwrap_or(StatusFilter::All),
            search_pattern: query.search_pattern(),
            limit: query.limit(),
        };

        self.tool_repo.list_tools(executor, company_id, &filter).await
    }

    pub async fn tool_details<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        tool_id: Uuid,
    ) -> Result<ToolDetails, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let tool = self
            .tool_repo
            .find_with_relations(&mut *conn, company_id, tool_id)
            .await?
            .ok_or(AppError::ToolNotFound)?;

        let maintenance_records = self
            .maintenance_repo
            .list_for_tool(&mut *conn, tool_id)
            .await?;

        Ok(ToolDetails {
            tool,
            maintenance_records,
        })
    }

    // ---
    // Escrita direta
    // ---

    /// Cadastra uma ferramenta `disponivel`, sem responsável.
    pub async fn create_tool<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        created_by: Uuid,
        payload: CreateToolPayload,
    ) -> Result<ToolWithRelations, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let fields = payload.normalized();
        fields.validate()?;

        let new_tool = NewTool {
            fields,
            company_id,
            created_by,
        };
        let tool = self.tool_repo.create_tool(executor, &new_tool).await?;

        tracing::info!("🔧 Ferramenta criada: {} ({})", tool.tool.name, tool.tool.id);
        Ok(tool)
    }

    /// Atualização arbitrária, fora da máquina de estados e sem histórico.
    pub async fn update_tool<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        tool_id: Uuid,
        changes: ToolChanges,
    ) -> Result<ToolWithRelations, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        changes.validate()?;
        let changes = changes.with_consistent_assignment()?;

        if changes.is_empty() {
            return self
                .tool_repo
                .find_with_relations(executor, company_id, tool_id)
                .await?
                .ok_or(AppError::ToolNotFound);
        }

        self.tool_repo
            .update_tool(executor, company_id, tool_id, &changes)
            .await
            .map_err(missing_assignee)?
            .ok_or(AppError::ToolNotFound)
    }

    pub async fn delete_tool<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        tool_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if !self.tool_repo.delete_tool(executor, company_id, tool_id).await? {
            return Err(AppError::ToolNotFound);
        }
        tracing::info!("🗑️ Ferramenta removida: {}", tool_id);
        Ok(())
    }

    // ---
    // Ciclo de vida (atualização + histórico na mesma transação)
    // ---

    pub async fn assign_tool<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        actor: Uuid,
        tool_id: Uuid,
        payload: AssignToolPayload,
    ) -> Result<ToolWithRelations, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let request = ActionRequest {
            assignee: payload.user_id,
            location: None,
            notes: payload.notes,
        };
        self.apply_action(executor, company_id, actor, tool_id, ToolAction::Assign, request)
            .await
    }

    pub async fn return_tool<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        actor: Uuid,
        tool_id: Uuid,
        payload: ReturnToolPayload,
    ) -> Result<ToolWithRelations, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let request = ActionRequest {
            assignee: None,
            location: payload.location,
            notes: payload.notes,
        };
        self.apply_action(executor, company_id, actor, tool_id, ToolAction::Return, request)
            .await
    }

    pub async fn send_to_maintenance<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        actor: Uuid,
        tool_id: Uuid,
        payload: MaintenancePayload,
    ) -> Result<ToolWithRelations, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let request = ActionRequest {
            assignee: None,
            location: payload.location,
            notes: payload.notes,
        };
        self.apply_action(
            executor,
            company_id,
            actor,
            tool_id,
            ToolAction::SendToMaintenance,
            request,
        )
        .await
    }

    pub async fn return_from_maintenance<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        actor: Uuid,
        tool_id: Uuid,
        payload: ReturnToolPayload,
    ) -> Result<ToolWithRelations, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let request = ActionRequest {
            assignee: None,
            location: payload.location,
            notes: payload.notes,
        };
        self.apply_action(
            executor,
            company_id,
            actor,
            tool_id,
            ToolAction::ReturnFromMaintenance,
            request,
        )
        .await
    }

    async fn apply_action<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        actor: Uuid,
        tool_id: Uuid,
        action: ToolAction,
        request: ActionRequest,
    ) -> Result<ToolWithRelations, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // Trava a linha: os valores "anteriores" do histórico ficam consistentes
        let tool = self
            .tool_repo
            .find_for_update(&mut *tx, company_id, tool_id)
            .await?
            .ok_or(AppError::ToolNotFound)?;

        let plan = plan_transition(&tool, action, actor, &request, Utc::now())?;

        let updated = self
            .tool_repo
            .update_tool(&mut *tx, company_id, tool_id, &plan.changes)
            .await
            .map_err(missing_assignee)?
            .ok_or(AppError::ToolNotFound)?;

        self.activity_repo
            .record_movement(&mut *tx, &plan.movement)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "🔁 {} -> {} na ferramenta {} por {}",
            tool.status,
            updated.tool.status,
            tool_id,
            actor
        );
        Ok(updated)
    }

    // ---
    // Categorias
    // ---

    pub async fn list_categories<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
    ) -> Result<Vec<ToolCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.tool_repo.list_categories(executor, company_id).await
    }

    pub async fn create_category<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        payload: &CreateCategoryPayload,
    ) -> Result<ToolCategory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        payload.validate()?;
        self.tool_repo
            .create_category(executor, company_id, payload)
            .await
    }
}

// Responsável inexistente chega como violação de FK
fn missing_assignee(e: AppError) -> AppError {
    let fk_violation = matches!(
        &e,
        AppError::DatabaseError(db)
            if db.as_database_error().is_some_and(|d| d.is_foreign_key_violation())
    );
    if fk_violation {
        AppError::ProfileNotFound
    } else {
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movement::fixtures::tool;
    use crate::models::tool::ToolStatus;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn assign_sets_assignee_and_timestamp() {
        let t = tool(Uuid::new_v4(), ToolStatus::Disponivel);
        let actor = Uuid::new_v4();
        let worker = Uuid::new_v4();
        let at = now();

        let plan = plan_transition(
            &t,
            ToolAction::Assign,
            actor,
            &ActionRequest {
                assignee: Some(worker),
                ..Default::default()
            },
            at,
        )
        .unwrap();

        assert_eq!(plan.changes.status, Some(ToolStatus::EmUso));
        assert_eq!(plan.changes.assigned_to, Some(Some(worker)));
        assert_eq!(plan.changes.assigned_at, Some(Some(at)));
        assert_eq!(plan.changes.location, None);

        assert_eq!(plan.movement.action, MovementAction::Emprestado);
        assert_eq!(plan.movement.user_id, actor);
        assert_eq!(plan.movement.previous_status.as_deref(), Some("disponivel"));
        assert_eq!(plan.movement.new_status, "em_uso");
        assert_eq!(plan.movement.new_assigned_to, Some(worker));
        assert_eq!(plan.movement.new_location.as_deref(), Some("Almoxarifado A"));
    }

    #[test]
    fn assign_defaults_to_the_actor() {
        let t = tool(Uuid::new_v4(), ToolStatus::Disponivel);
        let actor = Uuid::new_v4();

        let plan =
            plan_transition(&t, ToolAction::Assign, actor, &ActionRequest::default(), now())
                .unwrap();

        assert_eq!(plan.changes.assigned_to, Some(Some(actor)));
    }

    #[test]
    fn return_clears_assignment() {
        let mut t = tool(Uuid::new_v4(), ToolStatus::EmUso);
        let holder = Uuid::new_v4();
        t.assigned_to = Some(holder);
        t.assigned_at = Some(now());

        let plan =
            plan_transition(&t, ToolAction::Return, holder, &ActionRequest::default(), now())
                .unwrap();

        assert_eq!(plan.changes.status, Some(ToolStatus::Disponivel));
        assert_eq!(plan.changes.assigned_to, Some(None));
        assert_eq!(plan.changes.assigned_at, Some(None));
        assert_eq!(plan.movement.action, MovementAction::Devolvido);
        assert_eq!(plan.movement.previous_assigned_to, Some(holder));
        assert_eq!(plan.movement.new_assigned_to, None);
    }

    #[test]
    fn maintenance_uses_default_location() {
        let t = tool(Uuid::new_v4(), ToolStatus::EmUso);

        let plan = plan_transition(
            &t,
            ToolAction::SendToMaintenance,
            Uuid::new_v4(),
            &ActionRequest {
                location: Some("  ".into()),
                ..Default::default()
            },
            now(),
        )
        .unwrap();

        assert_eq!(plan.changes.status, Some(ToolStatus::Manutencao));
        assert_eq!(
            plan.changes.location.as_deref(),
            Some(DEFAULT_MAINTENANCE_LOCATION)
        );
        assert_eq!(plan.changes.assigned_to, Some(None));
        assert_eq!(plan.movement.action, MovementAction::ManutencaoEnviado);
        assert_eq!(
            plan.movement.new_location.as_deref(),
            Some(DEFAULT_MAINTENANCE_LOCATION)
        );
    }

    #[test]
    fn back_from_maintenance_accepts_new_location() {
        let t = tool(Uuid::new_v4(), ToolStatus::Manutencao);

        let plan = plan_transition(
            &t,
            ToolAction::ReturnFromMaintenance,
            Uuid::new_v4(),
            &ActionRequest {
                location: Some("Almoxarifado B".into()),
                ..Default::default()
            },
            now(),
        )
        .unwrap();

        assert_eq!(plan.changes.status, Some(ToolStatus::Disponivel));
        assert_eq!(plan.changes.location.as_deref(), Some("Almoxarifado B"));
        assert_eq!(plan.movement.action, MovementAction::ManutencaoRetornado);
    }

    #[test]
    fn rejects_transitions_outside_the_lifecycle() {
        let t = tool(Uuid::new_v4(), ToolStatus::Manutencao);

        let err = plan_transition(
            &t,
            ToolAction::Assign,
            Uuid::new_v4(),
            &ActionRequest::default(),
            now(),
        )
        .unwrap_err();

        match err {
            AppError::InvalidTransition { from, action } => {
                assert_eq!(from, "manutencao");
                assert_eq!(action, "assign");
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn assign_then_return_restores_availability() {
        let actor = Uuid::new_v4();
        let mut t = tool(Uuid::new_v4(), ToolStatus::Disponivel);

        let assign =
            plan_transition(&t, ToolAction::Assign, actor, &ActionRequest::default(), now())
                .unwrap();
        t.status = assign.changes.status.unwrap();
        t.assigned_to = assign.changes.assigned_to.unwrap();
        t.assigned_at = assign.changes.assigned_at.unwrap();

        let back =
            plan_transition(&t, ToolAction::Return, actor, &ActionRequest::default(), now())
                .unwrap();
        t.status = back.changes.status.unwrap();
        t.assigned_to = back.changes.assigned_to.unwrap();
        t.assigned_at = back.changes.assigned_at.unwrap();

        assert_eq!(t.status, ToolStatus::Disponivel);
        assert_eq!(t.assigned_to, None);
        assert_eq!(t.assigned_at, None);
    }
}
