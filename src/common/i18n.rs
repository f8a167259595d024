// src/common/i18n.rs

use std::collections::HashMap;

const DEFAULT_LANG: &str = "pt";

// (chave, português, inglês)
const MESSAGES: &[(&str, &str, &str)] = &[
    ("validation_failed", "Um ou mais campos são inválidos.", "One or more fields are invalid."),
    ("email_already_exists", "Este e-mail já está em uso.", "This e-mail is already in use."),
    ("invalid_credentials", "E-mail ou senha inválidos.", "Invalid e-mail or password."),
    ("invalid_token", "Token de autenticação inválido ou ausente.", "Missing or invalid authentication token."),
    ("profile_not_found", "Perfil de usuário não encontrado.", "User profile not found."),
    ("tool_not_found", "Ferramenta não encontrada.", "Tool not found."),
    ("notification_not_found", "Notificação não encontrada.", "Notification not found."),
    ("category_already_exists", "Já existe uma categoria com este nome.", "A category with this name already exists."),
    ("invalid_transition", "Esta ação não é permitida para o status atual da ferramenta.", "This action is not allowed for the tool's current status."),
    ("record_not_found", "Registro não encontrado.", "Record not found."),
    ("unexpected_error", "Ocorreu um erro inesperado.", "An unexpected error occurred."),
];

/// Catálogo de mensagens de erro por idioma.
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        let mut pt = HashMap::new();
        let mut en = HashMap::new();
        for (key, pt_msg, en_msg) in MESSAGES {
            pt.insert(*key, *pt_msg);
            en.insert(*key, *en_msg);
        }

        let mut catalogs = HashMap::new();
        catalogs.insert("pt", pt);
        catalogs.insert("en", en);
        Self { catalogs }
    }
}

impl I18nStore {
    /// Traduz `key` para `lang`; idiomas desconhecidos caem no português.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.catalogs
            .get(lang)
            .or_else(|| self.catalogs.get(DEFAULT_LANG))
            .and_then(|catalog| catalog.get(key))
            .map(|m| m.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}
