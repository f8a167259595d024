// src/models/profile.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, types::Json, FromRow, Row};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::serde_utils::double_option;
use crate::models::company::Company;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Encarregado,
    MestreObras,
    Operario,
    Almoxarife,
}

/// Regras de mapeamento do cargo digitado no cadastro, avaliadas em ordem.
/// A primeira palavra-chave contida no texto (minúsculo) decide o cargo.
pub const ROLE_RULES: &[(&str, UserRole)] = &[
    ("admin", UserRole::Admin),
    ("encarregado", UserRole::Encarregado),
    ("mestre", UserRole::MestreObras),
    ("almoxarife", UserRole::Almoxarife),
    ("desenvolvedor", UserRole::Admin),
    ("gerente", UserRole::Encarregado),
    ("supervisor", UserRole::Encarregado),
];

impl UserRole {
    /// Converte o cargo em texto livre; sem correspondência vira `Operario`.
    pub fn from_free_text(input: &str) -> Self {
        let role = input.to_lowercase();
        ROLE_RULES
            .iter()
            .find(|(keyword, _)| role.contains(keyword))
            .map(|(_, mapped)| *mapped)
            .unwrap_or(UserRole::Operario)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Encarregado => "encarregado",
            UserRole::MestreObras => "mestre_obras",
            UserRole::Operario => "operario",
            UserRole::Almoxarife => "almoxarife",
        }
    }
}

// Perfil da aplicação (1:1 com a identidade de autenticação)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub cpf: String,
    pub role: UserRole,
    pub company_id: Uuid,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileWithCompany {
    #[serde(flatten)]
    pub profile: Profile,
    pub company: Option<Company>,
}

impl<'r> FromRow<'r, PgRow> for ProfileWithCompany {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let profile = Profile::from_row(row)?;
        let company: Option<Json<Company>> = row.try_get("company")?;
        Ok(Self {
            profile,
            company: company.map(|c| c.0),
        })
    }
}

/// Atualização parcial do próprio perfil.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfilePayload {
    #[validate(length(min = 2, max = 100, message = "O nome deve ter entre 2 e 100 caracteres."))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,

    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub avatar_url: Option<Option<String>>,
}

impl UpdateProfilePayload {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.phone.is_none() && self.avatar_url.is_none()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserStats {
    /// Ferramentas em uso atribuídas ao usuário.
    pub tools_in_use: i64,
    /// Devoluções registradas pelo usuário.
    pub total_returns: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_free_text_roles() {
        assert_eq!(UserRole::from_free_text("Administrador"), UserRole::Admin);
        assert_eq!(UserRole::from_free_text("ENCARREGADO de obra"), UserRole::Encarregado);
        assert_eq!(UserRole::from_free_text("Mestre de Obras"), UserRole::MestreObras);
        assert_eq!(UserRole::from_free_text("almoxarife"), UserRole::Almoxarife);
        assert_eq!(UserRole::from_free_text("Desenvolvedor"), UserRole::Admin);
        assert_eq!(UserRole::from_free_text("Gerente"), UserRole::Encarregado);
        assert_eq!(UserRole::from_free_text("supervisor de campo"), UserRole::Encarregado);
        assert_eq!(UserRole::from_free_text("Pedreiro"), UserRole::Operario);
        assert_eq!(UserRole::from_free_text(""), UserRole::Operario);
    }

    #[test]
    fn first_matching_rule_wins() {
        // "admin" vem antes de "gerente" na tabela
        assert_eq!(UserRole::from_free_text("gerente admin"), UserRole::Admin);
        assert_eq!(UserRole::from_free_text("mestre almoxarife"), UserRole::MestreObras);
    }

    #[test]
    fn partial_update_distinguishes_null_from_absent() {
        let payload: UpdateProfilePayload =
            serde_json::from_str(r#"{"phone": null}"#).unwrap();
        assert_eq!(payload.phone, Some(None));
        assert_eq!(payload.avatar_url, None);
        assert!(!payload.is_empty());

        let empty: UpdateProfilePayload = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
