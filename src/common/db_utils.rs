use sqlx::{Postgres, Transaction};

use crate::common::error::AppError;
use crate::config::AppState;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::tenancy::CompanyContext;

// ---
// Helper RLS: a "chave" para o banco de dados
// ---
/// Abre uma transação e define as variáveis usadas pelas políticas RLS.
///
/// `set_config(..., true)` vale só até o fim da transação, por isso a conexão
/// devolvida já é uma transação: quem chama faz `commit()` após escrever.
pub(crate) async fn get_rls_transaction(
    app_state: &AppState,
    company: &CompanyContext,
    user: &AuthenticatedUser,
) -> Result<Transaction<'static, Postgres>, AppError> {
    let mut tx = app_state.db_pool.begin().await?;

    sqlx::query("SELECT set_config('app.company_id', $1, true)")
        .bind(company.0.to_string())
        .execute(&mut *tx)
        .await?;

    sqlx::query("SELECT set_config('app.user_id', $1, true)")
        .bind(user.user_id.to_string())
        .execute(&mut *tx)
        .await?;

    Ok(tx)
}
