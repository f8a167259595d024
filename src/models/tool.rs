// src/models/tool.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, types::Json, FromRow, Row};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::common::serde_utils::double_option;
use crate::models::{company::Company, profile::Profile};

/// Local padrão para onde vão as ferramentas enviadas à manutenção.
pub const DEFAULT_MAINTENANCE_LOCATION: &str = "Oficina de Manutenção";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tool_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Disponivel,
    EmUso,
    Manutencao,
    Danificada,
    Descartada,
}

impl ToolStatus {
    pub const ALL: [ToolStatus; 5] = [
        ToolStatus::Disponivel,
        ToolStatus::EmUso,
        ToolStatus::Manutencao,
        ToolStatus::Danificada,
        ToolStatus::Descartada,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::Disponivel => "disponivel",
            ToolStatus::EmUso => "em_uso",
            ToolStatus::Manutencao => "manutencao",
            ToolStatus::Danificada => "danificada",
            ToolStatus::Descartada => "descartada",
        }
    }

    /// Rótulo exibido nas telas.
    pub fn label(&self) -> &'static str {
        match self {
            ToolStatus::Disponivel => "Disponível",
            ToolStatus::EmUso => "Em Uso",
            ToolStatus::Manutencao => "Em Manutenção",
            ToolStatus::Danificada => "Danificada",
            ToolStatus::Descartada => "Descartada",
        }
    }

    /// Próximo status para a ação, ou `None` se a transição não é permitida.
    ///
    /// ```text
    /// disponivel --assign--> em_uso
    /// em_uso --return--> disponivel
    /// {disponivel, em_uso} --send_to_maintenance--> manutencao
    /// manutencao --return_from_maintenance--> disponivel
    /// ```
    /// `danificada` e `descartada` só são alcançados por atualização direta.
    pub fn next(self, action: ToolAction) -> Option<ToolStatus> {
        use ToolAction::*;
        use ToolStatus::*;

        match (self, action) {
            (Disponivel, Assign) => Some(EmUso),
            (EmUso, Return) => Some(Disponivel),
            (Disponivel | EmUso, SendToMaintenance) => Some(Manutencao),
            (Manutencao, ReturnFromMaintenance) => Some(Disponivel),
            _ => None,
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("status desconhecido: {s}"))
    }
}

/// Ações modeladas do ciclo de vida de uma ferramenta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ToolAction {
    Assign,
    Return,
    SendToMaintenance,
    ReturnFromMaintenance,
}

impl ToolAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolAction::Assign => "assign",
            ToolAction::Return => "return",
            ToolAction::SendToMaintenance => "send_to_maintenance",
            ToolAction::ReturnFromMaintenance => "return_from_maintenance",
        }
    }
}

// --- Categoria ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ToolCategory {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub company_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryPayload {
    #[validate(length(min = 2, max = 50, message = "A categoria deve ter entre 2 e 50 caracteres."))]
    pub name: String,
    #[validate(length(max = 500, message = "A descrição deve ter menos de 500 caracteres."))]
    pub description: Option<String>,
    pub icon: Option<String>,
}

// --- Ferramenta ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tool {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub serial_number: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<Decimal>,
    pub status: ToolStatus,
    pub location: String,
    pub category_id: Option<Uuid>,
    pub company_id: Uuid,
    /// Preenchido se e somente se `status == em_uso`.
    pub assigned_to: Option<Uuid>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub qr_code: Option<String>,
    pub photo_url: Option<String>,
    pub observations: Option<String>,
    pub next_maintenance_date: Option<NaiveDate>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ferramenta com categoria, responsável e empresa expandidos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ToolWithRelations {
    #[serde(flatten)]
    pub tool: Tool,
    pub category: Option<ToolCategory>,
    pub assigned_user: Option<Profile>,
    pub company: Option<Company>,
}

impl<'r> FromRow<'r, PgRow> for ToolWithRelations {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let tool = Tool::from_row(row)?;
        let category: Option<Json<ToolCategory>> = row.try_get("category")?;
        let assigned_user: Option<Json<Profile>> = row.try_get("assigned_user")?;
        let company: Option<Json<Company>> = row.try_get("company")?;

        Ok(Self {
            tool,
            category: category.map(|j| j.0),
            assigned_user: assigned_user.map(|j| j.0),
            company: company.map(|j| j.0),
        })
    }
}

/// Detalhe da ferramenta: relações + histórico de manutenção.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ToolDetails {
    #[serde(flatten)]
    pub tool: ToolWithRelations,
    pub maintenance_records: Vec<crate::models::maintenance::MaintenanceRecord>,
}

// --- Cadastro ---
// Obrigatórios: nome e local. Empresa e criador vêm do usuário autenticado.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateToolPayload {
    #[validate(length(min = 2, max = 100, message = "O nome deve ter entre 2 e 100 caracteres."))]
    pub name: String,

    #[validate(length(max = 500, message = "A descrição deve ter menos de 500 caracteres."))]
    pub description: Option<String>,

    #[validate(length(min = 3, max = 50, message = "O número de série deve ter entre 3 e 50 caracteres."))]
    pub serial_number: Option<String>,

    #[validate(length(max = 50, message = "A marca deve ter menos de 50 caracteres."))]
    pub brand: Option<String>,

    #[validate(length(max = 50, message = "O modelo deve ter menos de 50 caracteres."))]
    pub model: Option<String>,

    #[validate(length(min = 2, max = 100, message = "A localização deve ter entre 2 e 100 caracteres."))]
    pub location: String,

    pub category_id: Option<Uuid>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<Decimal>,
    pub next_maintenance_date: Option<NaiveDate>,
    pub photo_url: Option<String>,

    #[validate(length(max = 1000, message = "As observações devem ter menos de 1000 caracteres."))]
    pub observations: Option<String>,
}

impl CreateToolPayload {
    /// Campos opcionais em branco viram `None`.
    pub fn normalized(mut self) -> Self {
        fn blank_to_none(field: &mut Option<String>) {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }
        blank_to_none(&mut self.description);
        blank_to_none(&mut self.serial_number);
        blank_to_none(&mut self.brand);
        blank_to_none(&mut self.model);
        blank_to_none(&mut self.photo_url);
        blank_to_none(&mut self.observations);
        self
    }
}

/// Linha a inserir em `tools`. O status inicial é sempre `disponivel`.
#[derive(Debug, Clone)]
pub struct NewTool {
    pub fields: CreateToolPayload,
    pub company_id: Uuid,
    pub created_by: Uuid,
}

/// Atualização parcial e arbitrária de uma ferramenta.
///
/// `None` = não mexer; `Some(None)` = gravar NULL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ToolChanges {
    #[validate(length(min = 2, max = 100, message = "O nome deve ter entre 2 e 100 caracteres."))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub serial_number: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub brand: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub model: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<NaiveDate>)]
    pub purchase_date: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Decimal>)]
    pub purchase_price: Option<Option<Decimal>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ToolStatus>,

    #[validate(length(min = 2, max = 100, message = "A localização deve ter entre 2 e 100 caracteres."))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Uuid>)]
    pub category_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Uuid>)]
    pub assigned_to: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub assigned_at: Option<Option<DateTime<Utc>>>,

    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub qr_code: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub photo_url: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub observations: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<NaiveDate>)]
    pub next_maintenance_date: Option<Option<NaiveDate>>,
}

impl ToolChanges {
    pub fn is_empty(&self) -> bool {
        *self == ToolChanges::default()
    }

    /// Mantém o par status/responsável coerente: responsável preenchido se e
    /// somente se o status for `em_uso`. Um status diferente de `em_uso` sem
    /// responsável explícito limpa a atribuição; combinações que quebrariam a
    /// regra são recusadas.
    pub fn with_consistent_assignment(mut self) -> Result<Self, ValidationErrors> {
        match (self.status, self.assigned_to) {
            (Some(ToolStatus::EmUso), Some(Some(_))) => {}
            (Some(ToolStatus::EmUso), _) => {
                return Err(assignment_error(
                    "status",
                    "Uma ferramenta em uso precisa de um responsável.",
                ))
            }
            (Some(_), Some(Some(_))) => {
                return Err(assignment_error(
                    "assigned_to",
                    "Só ferramentas em uso podem ter responsável.",
                ))
            }
            (Some(_), _) => {
                self.assigned_to = Some(None);
                self.assigned_at = Some(None);
            }
            (None, Some(_)) => {
                return Err(assignment_error(
                    "assigned_to",
                    "Informe o status junto com o responsável.",
                ))
            }
            (None, None) => {}
        }

        if let Some(Some(_)) = self.assigned_to {
            if self.assigned_at.is_none() {
                self.assigned_at = Some(Some(Utc::now()));
            }
        }
        Ok(self)
    }
}

fn assignment_error(field: &'static str, message: &'static str) -> ValidationErrors {
    let mut err = ValidationError::new("assignment");
    err.message = Some(message.into());
    let mut errors = ValidationErrors::new();
    errors.add(field, err);
    errors
}

/// Filtro de status da listagem: um status exato ou "all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(ToolStatus),
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}

fn validate_status_filter(status: &str) -> Result<(), ValidationError> {
    match status {
        "" => Ok(()),
        raw => raw.parse::<StatusFilter>().map(|_| ()).map_err(|_| {
            let mut err = ValidationError::new("status");
            err.message = Some("Status desconhecido.".into());
            err
        }),
    }
}

/// Parâmetros de `fetchTools`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ToolQuery {
    /// Status exato ou `all`.
    #[validate(custom(function = "validate_status_filter"))]
    pub status: Option<String>,
    /// Busca parcial (sem diferenciar maiúsculas) em nome, descrição ou nº de série.
    pub search: Option<String>,
    pub limit: Option<i64>,
}

impl ToolQuery {
    pub fn status_filter(&self) -> Result<StatusFilter, String> {
        match self.status.as_deref() {
            None | Some("") => Ok(StatusFilter::All),
            Some(raw) => raw.parse(),
        }
    }

    /// Termo de busca já no formato ILIKE (`%termo%`), ou `None` se vazio.
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(|term| format!("%{term}%"))
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit.filter(|l| *l > 0)
    }
}

// Corpo de POST /tools/{id}/assign
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AssignToolPayload {
    /// Responsável; quando ausente, a ferramenta é emprestada a quem pede.
    pub user_id: Option<Uuid>,
    pub notes: Option<String>,
}

// Corpo de POST /tools/{id}/return e /maintenance/return
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ReturnToolPayload {
    pub location: Option<String>,
    pub notes: Option<String>,
}

// Corpo de POST /tools/{id}/maintenance
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MaintenancePayload {
    /// Padrão: "Oficina de Manutenção".
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_machine_matches_lifecycle() {
        use ToolAction::*;
        use ToolStatus::*;

        assert_eq!(Disponivel.next(Assign), Some(EmUso));
        assert_eq!(EmUso.next(Return), Some(Disponivel));
        assert_eq!(Disponivel.next(SendToMaintenance), Some(Manutencao));
        assert_eq!(EmUso.next(SendToMaintenance), Some(Manutencao));
        assert_eq!(Manutencao.next(ReturnFromMaintenance), Some(Disponivel));

        assert_eq!(EmUso.next(Assign), None);
        assert_eq!(Disponivel.next(Return), None);
        assert_eq!(Manutencao.next(Assign), None);
        assert_eq!(Manutencao.next(SendToMaintenance), None);
        for action in [Assign, Return, SendToMaintenance, ReturnFromMaintenance] {
            assert_eq!(Danificada.next(action), None);
            assert_eq!(Descartada.next(action), None);
        }
    }

    #[test]
    fn parses_status_filter() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "manutencao".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(ToolStatus::Manutencao))
        );
        assert!("quebrada".parse::<StatusFilter>().is_err());

        let query = ToolQuery::default();
        assert_eq!(query.status_filter(), Ok(StatusFilter::All));
        assert!(query.validate().is_ok());

        let unknown = ToolQuery {
            status: Some("quebrada".into()),
            ..Default::default()
        };
        assert!(unknown.validate().is_err());
    }

    #[test]
    fn search_pattern_is_trimmed_and_wrapped() {
        let query = ToolQuery {
            search: Some("  furadeira ".into()),
            ..Default::default()
        };
        assert_eq!(query.search_pattern().as_deref(), Some("%furadeira%"));

        let blank = ToolQuery {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(blank.search_pattern(), None);
    }

    #[test]
    fn non_positive_limit_is_ignored() {
        let query = ToolQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(query.limit(), None);
    }

    #[test]
    fn changing_status_away_from_em_uso_clears_assignment() {
        let changes = ToolChanges {
            status: Some(ToolStatus::Danificada),
            ..Default::default()
        }
        .with_consistent_assignment()
        .unwrap();

        assert_eq!(changes.assigned_to, Some(None));
        assert_eq!(changes.assigned_at, Some(None));
    }

    #[test]
    fn explicit_assignee_gets_timestamp() {
        let user = Uuid::new_v4();
        let changes = ToolChanges {
            status: Some(ToolStatus::EmUso),
            assigned_to: Some(Some(user)),
            ..Default::default()
        }
        .with_consistent_assignment()
        .unwrap();

        assert_eq!(changes.assigned_to, Some(Some(user)));
        assert!(matches!(changes.assigned_at, Some(Some(_))));
    }

    #[test]
    fn mismatched_status_and_assignee_are_rejected() {
        let user = Uuid::new_v4();
        let cases = [
            // em_uso sem responsável
            ToolChanges {
                status: Some(ToolStatus::EmUso),
                ..Default::default()
            },
            ToolChanges {
                status: Some(ToolStatus::EmUso),
                assigned_to: Some(None),
                ..Default::default()
            },
            // responsável em ferramenta fora de uso
            ToolChanges {
                status: Some(ToolStatus::Danificada),
                assigned_to: Some(Some(user)),
                ..Default::default()
            },
            // responsável sem status
            ToolChanges {
                assigned_to: Some(Some(user)),
                ..Default::default()
            },
            ToolChanges {
                assigned_to: Some(None),
                ..Default::default()
            },
        ];

        for changes in cases {
            assert!(changes.clone().with_consistent_assignment().is_err(), "{changes:?}");
        }
    }

    #[test]
    fn changes_without_status_or_assignee_pass_through() {
        let changes = ToolChanges {
            name: Some("Furadeira nova".into()),
            ..Default::default()
        };
        assert_eq!(changes.clone().with_consistent_assignment().unwrap(), changes);
    }

    #[test]
    fn blank_optional_fields_become_none() {
        let payload = CreateToolPayload {
            name: "Furadeira".into(),
            location: "Almoxarifado A".into(),
            description: Some("".into()),
            serial_number: Some("  ".into()),
            brand: Some("Bosch".into()),
            ..Default::default()
        }
        .normalized();

        assert_eq!(payload.description, None);
        assert_eq!(payload.serial_number, None);
        assert_eq!(payload.brand.as_deref(), Some("Bosch"));
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn status_labels() {
        assert_eq!(ToolStatus::Manutencao.label(), "Em Manutenção");
        assert_eq!(ToolStatus::EmUso.to_string(), "em_uso");
    }
}
