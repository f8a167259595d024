// src/models/movement.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, types::Json, FromRow, Row};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{profile::Profile, tool::Tool};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "movement_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MovementAction {
    Emprestado,
    Devolvido,
    ManutencaoEnviado,
    ManutencaoRetornado,
    Transferido,
    Descartado,
}

// --- Histórico (livro-razão, somente inserção) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ToolMovement {
    pub id: Uuid,
    pub tool_id: Uuid,
    /// Quem executou a ação.
    pub user_id: Uuid,
    pub action: MovementAction,
    pub previous_status: Option<String>,
    pub new_status: String,
    pub previous_location: Option<String>,
    pub new_location: Option<String>,
    pub previous_assigned_to: Option<Uuid>,
    pub new_assigned_to: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Linha a inserir em `tool_movements`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovement {
    pub tool_id: Uuid,
    pub user_id: Uuid,
    pub action: MovementAction,
    pub previous_status: Option<String>,
    pub new_status: String,
    pub previous_location: Option<String>,
    pub new_location: Option<String>,
    pub previous_assigned_to: Option<Uuid>,
    pub new_assigned_to: Option<Uuid>,
    pub notes: Option<String>,
}

/// Movimentação com as referências expandidas. Qualquer uma pode vir vazia
/// (linha apagada ou invisível pela política da empresa).
#[derive(Debug, Clone, PartialEq)]
pub struct MovementWithRelations {
    pub movement: ToolMovement,
    pub tool: Option<Tool>,
    pub user: Option<Profile>,
    pub previous_assigned_user: Option<Profile>,
    pub new_assigned_user: Option<Profile>,
}

impl<'r> FromRow<'r, PgRow> for MovementWithRelations {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let movement = ToolMovement::from_row(row)?;
        let tool: Option<Json<Tool>> = row.try_get("tool")?;
        let user: Option<Json<Profile>> = row.try_get("user")?;
        let previous_assigned_user: Option<Json<Profile>> = row.try_get("previous_assigned_user")?;
        let new_assigned_user: Option<Json<Profile>> = row.try_get("new_assigned_user")?;

        Ok(Self {
            movement,
            tool: tool.map(|j| j.0),
            user: user.map(|j| j.0),
            previous_assigned_user: previous_assigned_user.map(|j| j.0),
            new_assigned_user: new_assigned_user.map(|j| j.0),
        })
    }
}

impl MovementWithRelations {
    /// `None` quando a ferramenta ou o autor não resolvem (linha órfã).
    pub fn into_activity(self) -> Option<Activity> {
        Some(Activity {
            tool: self.tool?,
            user: self.user?,
            movement: self.movement,
            previous_assigned_user: self.previous_assigned_user,
            new_assigned_user: self.new_assigned_user,
        })
    }
}

/// Item do feed de atividades: ferramenta e autor sempre presentes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Activity {
    #[serde(flatten)]
    pub movement: ToolMovement,
    pub tool: Tool,
    pub user: Profile,
    pub previous_assigned_user: Option<Profile>,
    pub new_assigned_user: Option<Profile>,
}

/// Descarta órfãos preservando a ordem (mais recentes primeiro).
pub fn valid_activities(rows: Vec<MovementWithRelations>) -> Vec<Activity> {
    rows.into_iter()
        .filter_map(MovementWithRelations::into_activity)
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::models::profile::UserRole;
    use crate::models::tool::ToolStatus;

    pub fn profile(id: Uuid) -> Profile {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        Profile {
            id,
            full_name: "Maria Souza".into(),
            cpf: "52998224725".into(),
            role: UserRole::Almoxarife,
            company_id: Uuid::nil(),
            avatar_url: None,
            phone: None,
            is_active: true,
            created_at: at,
            updated_at: at,
        }
    }

    pub fn tool(id: Uuid, status: ToolStatus) -> Tool {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        Tool {
            id,
            name: "Furadeira".into(),
            description: Some("Furadeira de impacto".into()),
            serial_number: Some("FD-001".into()),
            brand: None,
            model: None,
            purchase_date: None,
            purchase_price: None,
            status,
            location: "Almoxarifado A".into(),
            category_id: None,
            company_id: Uuid::nil(),
            assigned_to: None,
            assigned_at: None,
            qr_code: None,
            photo_url: None,
            observations: None,
            next_maintenance_date: None,
            created_by: Uuid::nil(),
            created_at: at,
            updated_at: at,
        }
    }

    pub fn movement(minute: u32, action: MovementAction) -> ToolMovement {
        ToolMovement {
            id: Uuid::new_v4(),
            tool_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            action,
            previous_status: Some("disponivel".into()),
            new_status: "em_uso".into(),
            previous_location: None,
            new_location: None,
            previous_assigned_to: None,
            new_assigned_to: None,
            notes: None,
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, minute, 0).unwrap(),
        }
    }

    pub fn row(minute: u32, with_tool: bool, with_user: bool) -> MovementWithRelations {
        let movement = movement(minute, MovementAction::Emprestado);
        MovementWithRelations {
            tool: with_tool.then(|| tool(movement.tool_id, ToolStatus::EmUso)),
            user: with_user.then(|| profile(movement.user_id)),
            previous_assigned_user: None,
            new_assigned_user: None,
            movement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::row;
    use super::*;

    #[test]
    fn drops_rows_without_tool_or_user() {
        let rows = vec![
            row(50, true, true),
            row(40, false, true),
            row(30, true, false),
            row(20, false, false),
            row(10, true, true),
        ];
        let expected: Vec<Uuid> = vec![rows[0].movement.id, rows[4].movement.id];

        let activities = valid_activities(rows);

        assert_eq!(
            activities.iter().map(|a| a.movement.id).collect::<Vec<_>>(),
            expected
        );
    }

    #[test]
    fn activity_serializes_flat() {
        let activity = row(1, true, true).into_activity().unwrap();
        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["action"], "emprestado");
        assert_eq!(json["tool"]["name"], "Furadeira");
        assert_eq!(json["user"]["role"], "almoxarife");
    }
}
