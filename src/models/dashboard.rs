// src/models/dashboard.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{movement::Activity, tool::ToolStatus};

/// Quantas movimentações recentes o painel mostra.
pub const RECENT_ACTIVITY_LIMIT: i64 = 10;

// Os cards do topo
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusCounts {
    pub total_tools: i64,
    pub available_tools: i64,
    pub in_use_tools: i64,
    pub maintenance_tools: i64,
    pub damaged_tools: i64,
}

impl StatusCounts {
    /// Conta no cliente a partir dos status de todas as ferramentas.
    /// `descartada` entra só no total.
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = ToolStatus>,
    {
        statuses.into_iter().fold(Self::default(), |mut acc, status| {
            acc.total_tools += 1;
            match status {
                ToolStatus::Disponivel => acc.available_tools += 1,
                ToolStatus::EmUso => acc.in_use_tools += 1,
                ToolStatus::Manutencao => acc.maintenance_tools += 1,
                ToolStatus::Danificada => acc.damaged_tools += 1,
                ToolStatus::Descartada => {}
            }
            acc
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub recent_activities: Vec<Activity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ToolStatus::*;

    #[test]
    fn counts_each_status() {
        let counts = StatusCounts::from_statuses([
            Disponivel, Disponivel, EmUso, Manutencao, Danificada, Descartada,
        ]);

        assert_eq!(
            counts,
            StatusCounts {
                total_tools: 6,
                available_tools: 2,
                in_use_tools: 1,
                maintenance_tools: 1,
                damaged_tools: 1,
            }
        );
    }

    #[test]
    fn empty_fleet_is_all_zero() {
        assert_eq!(StatusCounts::from_statuses([]), StatusCounts::default());
    }
}
