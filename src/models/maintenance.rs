// src/models/maintenance.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "maintenance_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    Preventiva,
    Corretiva,
    Emergencial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "maintenance_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Agendada,
    EmAndamento,
    Concluida,
    Cancelada,
}

// Um episódio de manutenção de uma ferramenta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub tool_id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: MaintenanceType,
    pub description: String,
    pub cost: Option<Decimal>,
    pub technician_name: Option<String>,
    pub company_service: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: MaintenanceStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O custo não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_period"))]
pub struct CreateMaintenancePayload {
    #[serde(rename = "type")]
    pub kind: MaintenanceType,

    #[validate(length(min = 5, max = 1000, message = "A descrição deve ter entre 5 e 1000 caracteres."))]
    pub description: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub cost: Option<Decimal>,

    #[validate(length(max = 100, message = "O nome do técnico deve ter menos de 100 caracteres."))]
    pub technician_name: Option<String>,

    #[validate(length(max = 100, message = "A empresa de serviço deve ter menos de 100 caracteres."))]
    pub company_service: Option<String>,

    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,

    /// Padrão: `agendada`.
    pub status: Option<MaintenanceStatus>,
}

fn validate_period(payload: &CreateMaintenancePayload) -> Result<(), ValidationError> {
    match payload.end_date {
        Some(end) if end < payload.start_date => {
            let mut err = ValidationError::new("period");
            err.message = Some("A data final não pode ser anterior à inicial.".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn payload() -> CreateMaintenancePayload {
        CreateMaintenancePayload {
            kind: MaintenanceType::Corretiva,
            description: "Troca de escovas do motor".into(),
            cost: Some(Decimal::new(15000, 2)),
            technician_name: None,
            company_service: Some("Oficina Central".into()),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            end_date: None,
            status: None,
        }
    }

    #[test]
    fn rejects_period_ending_before_start() {
        assert!(payload().validate().is_ok());

        let mut backwards = payload();
        backwards.end_date = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert!(backwards.validate().is_err());
    }

    #[test]
    fn rejects_negative_cost() {
        let mut negative = payload();
        negative.cost = Some(Decimal::new(-1, 0));
        assert!(negative.validate().is_err());
    }

    #[test]
    fn type_field_uses_wire_name() {
        let json = serde_json::to_value(payload()).unwrap();
        assert_eq!(json["type"], "corretiva");
    }
}
