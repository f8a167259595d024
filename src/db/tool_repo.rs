// src/db/tool_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tool::{
        CreateCategoryPayload, NewTool, StatusFilter, Tool, ToolCategory, ToolChanges,
        ToolWithRelations,
    },
};

// Colunas de `tools t` + relações expandidas em JSONB.
// Uma relação sem linha correspondente vira NULL (e não um objeto vazio).
pub(crate) const TOOL_COLUMNS: &str = r#"
    t.*,
    CASE WHEN c.id IS NULL THEN NULL ELSE to_jsonb(c) END AS category,
    CASE WHEN p.id IS NULL THEN NULL ELSE to_jsonb(p) END AS assigned_user,
    CASE WHEN co.id IS NULL THEN NULL ELSE to_jsonb(co) END AS company
"#;

pub(crate) const TOOL_JOINS: &str = r#"
    LEFT JOIN tool_categories c ON c.id = t.category_id
    LEFT JOIN profiles p ON p.id = t.assigned_to
    LEFT JOIN companies co ON co.id = t.company_id
"#;

/// Filtros já interpretados de `fetchTools`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolListFilter {
    pub status: StatusFilter,
    /// Padrão ILIKE (`%termo%`).
    pub search_pattern: Option<String>,
    pub limit: Option<i64>,
}

// Monta a listagem: empresa, status exato, busca OU em três colunas, mais recentes primeiro.
pub(crate) fn build_list_query(
    company_id: Uuid,
    filter: &ToolListFilter,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(TOOL_COLUMNS)
        .push(" FROM tools t ")
        .push(TOOL_JOINS)
        .push(" WHERE t.company_id = ")
        .push_bind(company_id);

    if let StatusFilter::Only(status) = filter.status {
        qb.push(" AND t.status = ").push_bind(status);
    }

    if let Some(pattern) = &filter.search_pattern {
        qb.push(" AND (t.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR t.description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR t.serial_number ILIKE ")
            .push_bind(pattern.clone())
            .push(")");
    }

    qb.push(" ORDER BY t.created_at DESC");

    if let Some(limit) = filter.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }

    qb
}

// UPDATE parcial dentro de uma CTE, devolvendo a linha já com as relações.
pub(crate) fn build_update_query(
    company_id: Uuid,
    tool_id: Uuid,
    changes: &ToolChanges,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("WITH t AS (UPDATE tools SET updated_at = now()");

    if let Some(v) = &changes.name {
        qb.push(", name = ").push_bind(v.clone());
    }
    if let Some(v) = &changes.description {
        qb.push(", description = ").push_bind(v.clone());
    }
    if let Some(v) = &changes.serial_number {
        qb.push(", serial_number = ").push_bind(v.clone());
    }
    if let Some(v) = &changes.brand {
        qb.push(", brand = ").push_bind(v.clone());
    }
    if let Some(v) = &changes.model {
        qb.push(", model = ").push_bind(v.clone());
    }
    if let Some(v) = changes.purchase_date {
        qb.push(", purchase_date = ").push_bind(v);
    }
    if let Some(v) = changes.purchase_price {
        qb.push(", purchase_price = ").push_bind(v);
    }
    if let Some(v) = changes.status {
        qb.push(", status = ").push_bind(v);
    }
    if let Some(v) = &changes.location {
        qb.push(", location = ").push_bind(v.clone());
    }
    if let Some(v) = changes.category_id {
        qb.push(", category_id = ").push_bind(v);
    }
    if let Some(v) = changes.assigned_to {
        qb.push(", assigned_to = ").push_bind(v);
    }
    if let Some(v) = changes.assigned_at {
        qb.push(", assigned_at = ").push_bind(v);
    }
    if let Some(v) = &changes.qr_code {
        qb.push(", qr_code = ").push_bind(v.clone());
    }
    if let Some(v) = &changes.photo_url {
        qb.push(", photo_url = ").push_bind(v.clone());
    }
    if let Some(v) = &changes.observations {
        qb.push(", observations = ").push_bind(v.clone());
    }
    if let Some(v) = changes.next_maintenance_date {
        qb.push(", next_maintenance_date = ").push_bind(v);
    }

    qb.push(" WHERE id = ")
        .push_bind(tool_id)
        .push(" AND company_id = ")
        .push_bind(company_id)
        .push(" RETURNING *) SELECT ")
        .push(TOOL_COLUMNS)
        .push(" FROM t ")
        .push(TOOL_JOINS);

    qb
}

#[derive(Clone)]
pub struct ToolRepository {
    pool: PgPool,
}

impl ToolRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn list_tools<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        filter: &ToolListFilter,
    ) -> Result<Vec<ToolWithRelations>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = build_list_query(company_id, filter);
        let tools = qb
            .build_query_as::<ToolWithRelations>()
            .fetch_all(executor)
            .await?;
        Ok(tools)
    }

    pub async fn find_with_relations<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        tool_id: Uuid,
    ) -> Result<Option<ToolWithRelations>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {TOOL_COLUMNS} FROM tools t {TOOL_JOINS} WHERE t.id = $1 AND t.company_id = $2"
        );
        let tool = sqlx::query_as::<_, ToolWithRelations>(&sql)
            .bind(tool_id)
            .bind(company_id)
            .fetch_optional(executor)
            .await?;
        Ok(tool)
    }

    /// Lê a linha e a trava até o fim da transação (valores "anteriores" do histórico).
    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        tool_id: Uuid,
    ) -> Result<Option<Tool>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tool = sqlx::query_as::<_, Tool>(
            "SELECT * FROM tools WHERE id = $1 AND company_id = $2 FOR UPDATE",
        )
        .bind(tool_id)
        .bind(company_id)
        .fetch_optional(executor)
        .await?;
        Ok(tool)
    }

    // ---
    // Escrita
    // ---

    /// Insere uma ferramenta; status inicial `disponivel`, sem responsável.
    pub async fn create_tool<'e, E>(
        &self,
        executor: E,
        new_tool: &NewTool,
    ) -> Result<ToolWithRelations, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let f = &new_tool.fields;
        let sql = format!(
            r#"
            WITH t AS (
                INSERT INTO tools (
                    name, description, serial_number, brand, model, location,
                    category_id, company_id, created_by, purchase_date, purchase_price,
                    next_maintenance_date, photo_url, observations, status
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, 'disponivel')
                RETURNING *
            )
            SELECT {TOOL_COLUMNS} FROM t {TOOL_JOINS}
            "#
        );

        let tool = sqlx::query_as::<_, ToolWithRelations>(&sql)
            .bind(&f.name)
            .bind(&f.description)
            .bind(&f.serial_number)
            .bind(&f.brand)
            .bind(&f.model)
            .bind(&f.location)
            .bind(f.category_id)
            .bind(new_tool.company_id)
            .bind(new_tool.created_by)
            .bind(f.purchase_date)
            .bind(f.purchase_price)
            .bind(f.next_maintenance_date)
            .bind(&f.photo_url)
            .bind(&f.observations)
            .fetch_one(executor)
            .await?;
        Ok(tool)
    }

    /// Atualização parcial. `None` se a ferramenta não existe (ou não é da empresa).
    pub async fn update_tool<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        tool_id: Uuid,
        changes: &ToolChanges,
    ) -> Result<Option<ToolWithRelations>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = build_update_query(company_id, tool_id, changes);
        let tool = qb
            .build_query_as::<ToolWithRelations>()
            .fetch_optional(executor)
            .await?;
        Ok(tool)
    }

    /// Remove a ferramenta. Movimentações e manutenções caem pela FK do banco.
    pub async fn delete_tool<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        tool_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM tools WHERE id = $1 AND company_id = $2")
            .bind(tool_id)
            .bind(company_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
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
        let categories = sqlx::query_as::<_, ToolCategory>(
            "SELECT * FROM tool_categories WHERE company_id = $1 ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(executor)
        .await?;
        Ok(categories)
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
        sqlx::query_as::<_, ToolCategory>(
            r#"
            INSERT INTO tool_categories (name, description, icon, company_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.icon)
        .bind(company_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::CategoryNameAlreadyExists(payload.name.clone());
                }
            }
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tool::ToolStatus;

    fn filter(status: StatusFilter, search: Option<&str>, limit: Option<i64>) -> ToolListFilter {
        ToolListFilter {
            status,
            search_pattern: search.map(|s| format!("%{s}%")),
            limit,
        }
    }

    #[test]
    fn list_query_without_filters_orders_newest_first() {
        let qb = build_list_query(Uuid::nil(), &filter(StatusFilter::All, None, None));
        let sql = qb.sql();

        assert!(sql.contains("WHERE t.company_id = $1"));
        assert!(!sql.contains("t.status ="));
        assert!(!sql.contains("ILIKE"));
        assert!(sql.trim_end().ends_with("ORDER BY t.created_at DESC"));
    }

    #[test]
    fn search_is_a_disjunction_over_three_columns() {
        let qb = build_list_query(
            Uuid::nil(),
            &filter(StatusFilter::Only(ToolStatus::Manutencao), Some("drill"), Some(20)),
        );
        let sql = qb.sql();

        assert!(sql.contains("AND t.status = $2"));
        assert!(sql.contains(
            "AND (t.name ILIKE $3 OR t.description ILIKE $4 OR t.serial_number ILIKE $5)"
        ));
        assert!(sql.contains("LIMIT $6"));
    }

    #[test]
    fn update_query_only_touches_given_columns() {
        let changes = ToolChanges {
            status: Some(ToolStatus::Disponivel),
            assigned_to: Some(None),
            assigned_at: Some(None),
            ..Default::default()
        };
        let qb = build_update_query(Uuid::nil(), Uuid::nil(), &changes);
        let sql = qb.sql();

        assert!(sql.starts_with("WITH t AS (UPDATE tools SET updated_at = now()"));
        assert!(sql.contains(", status = $1"));
        assert!(sql.contains(", assigned_to = $2"));
        assert!(sql.contains(", assigned_at = $3"));
        assert!(sql.contains("WHERE id = $4 AND company_id = $5 RETURNING *"));
        assert!(!sql.contains("location ="));
        assert!(!sql.contains("name ="));
    }
}
