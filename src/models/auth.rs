// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Credencial guardada na tabela 'auth_users'
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha de 'auth_sessions'
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

/// Sessão vista pelo cliente: identidade e expiração.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub access_token: String,
    pub user_id: Uuid,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Para onde o app deve navegar dado o estado da sessão.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Landing {
    #[serde(rename = "/")]
    Home,
    #[serde(rename = "/welcome")]
    Welcome,
}

impl Landing {
    pub fn for_session<T>(session: Option<&T>) -> Self {
        if session.is_some() {
            Landing::Home
        } else {
            Landing::Welcome
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Landing::Home => "/",
            Landing::Welcome => "/welcome",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionInfo {
    pub session: Option<Session>,
    pub landing: Landing,
}

// ---
// Validações customizadas (espelham o formulário de cadastro)
// ---

/// CPF com dígitos verificadores; aceita com ou sem máscara.
pub fn validate_cpf(cpf: &str) -> Result<(), ValidationError> {
    if is_valid_cpf(cpf) {
        Ok(())
    } else {
        let mut err = ValidationError::new("cpf");
        err.message = Some("CPF inválido.".into());
        Err(err)
    }
}

pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    // Dígito verificador sobre os primeiros `count - 1` dígitos
    let check = |count: usize| -> u32 {
        let sum: u32 = digits[..count - 1]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (count as u32 - i as u32))
            .sum();
        ((sum * 10) % 11) % 10
    };

    check(10) == digits[9] && check(11) == digits[10]
}

pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let rules: [(&str, fn(char) -> bool, &str); 4] = [
        ("lowercase", |c| c.is_ascii_lowercase(), "A senha deve ter pelo menos uma letra minúscula."),
        ("uppercase", |c| c.is_ascii_uppercase(), "A senha deve ter pelo menos uma letra maiúscula."),
        ("digit", |c| c.is_ascii_digit(), "A senha deve ter pelo menos um número."),
        ("special", |c| "!@#$%^&*".contains(c), "A senha deve ter pelo menos um caractere especial."),
    ];

    for (code, predicate, message) in rules {
        if !password.chars().any(predicate) {
            let mut err = ValidationError::new(code);
            err.message = Some(message.into());
            return Err(err);
        }
    }
    Ok(())
}

// Dados para cadastro de um novo usuário
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SignUpPayload {
    #[validate(email(message = "Por favor, insira um email válido."))]
    pub email: String,

    #[validate(
        length(min = 8, max = 64, message = "A senha deve ter entre 8 e 64 caracteres."),
        custom(function = "validate_password_strength")
    )]
    pub password: String,

    #[validate(length(min = 2, max = 100, message = "O nome deve ter entre 2 e 100 caracteres."))]
    pub full_name: String,

    #[validate(
        length(min = 11, max = 14, message = "CPF deve ter 11 dígitos."),
        custom(function = "validate_cpf")
    )]
    pub cpf: String,

    /// Cargo em texto livre; mapeado para `UserRole` no servidor.
    #[validate(length(min = 2, max = 50, message = "Por favor, selecione seu cargo."))]
    pub role: String,

    #[validate(length(min = 4, max = 20, message = "Código da empresa deve ter entre 4 e 20 caracteres."))]
    pub company_code: String,

    #[serde(default)]
    pub phone: Option<String>,
}

// Dados para login
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SignInPayload {
    #[validate(email(message = "Por favor, insira um email válido."))]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Resposta de autenticação com a sessão
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub session: Session,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub sid: Uuid,  // Sessão em 'auth_sessions'
    pub email: String,
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up() -> SignUpPayload {
        SignUpPayload {
            email: "joao@obra.com.br".into(),
            password: "Senha@123".into(),
            full_name: "João da Silva".into(),
            cpf: "529.982.247-25".into(),
            role: "Mestre de obras".into(),
            company_code: "abc001".into(),
            phone: None,
        }
    }

    #[test]
    fn validates_cpf_check_digits() {
        assert!(is_valid_cpf("529.982.247-25"));
        assert!(is_valid_cpf("52998224725"));
        assert!(!is_valid_cpf("529.982.247-26"));
        assert!(!is_valid_cpf("111.111.111-11"));
        assert!(!is_valid_cpf("1234"));
    }

    #[test]
    fn sign_up_payload_rules() {
        assert!(sign_up().validate().is_ok());

        let mut weak = sign_up();
        weak.password = "senhafraca1".into();
        let errors = weak.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));

        let mut bad_cpf = sign_up();
        bad_cpf.cpf = "000.000.000-00".into();
        assert!(bad_cpf.validate().is_err());

        let mut short_code = sign_up();
        short_code.company_code = "AB".into();
        assert!(short_code.validate().is_err());
    }

    #[test]
    fn landing_follows_session_presence() {
        assert_eq!(Landing::for_session(Some(&())), Landing::Home);
        assert_eq!(Landing::for_session::<()>(None), Landing::Welcome);
        assert_eq!(serde_json::to_string(&Landing::Welcome).unwrap(), "\"/welcome\"");
    }
}
