// src/db/crud_repo.rs

use std::marker::PhantomData;

use serde::{ser::SerializeMap, Serialize, Serializer};
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    Executor, FromRow, PgPool, Postgres,
};
use uuid::Uuid;

use crate::common::{error::AppError, pagination::ListParams};

// ---
// Uma entidade persistida com o CRUD padrão.
// ---
// Cada tabela diz seu nome, como inserir e como atualizar; o resto
// (busca, paginação, exclusão lógica) é igual para todas.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static {
    const TABLE: &'static str;
    /// Nome legível, usado nas mensagens de `NotFound`.
    const NAME: &'static str;
    /// Chave da lista na resposta de `GET /{entidades}`.
    const PLURAL: &'static str;
    /// Colunas (ou expressões) comparadas com ILIKE na busca.
    const SEARCH_COLUMNS: &'static [&'static str] = &[];
    /// O que estourou quando o INSERT/UPDATE bate num índice único.
    const UNIQUE_LABEL: &'static str = "Registro";

    type Create: Send + Sync + 'static;
    type Update: Send + Sync + 'static;

    fn insert(draft: &Self::Create) -> QueryAs<'_, Postgres, Self, PgArguments>;

    /// `UPDATE … WHERE id = $1 AND deleted_at IS NULL RETURNING *`
    fn update(id: Uuid, patch: &Self::Update) -> QueryAs<'_, Postgres, Self, PgArguments>;
}

// Uma página de resultados: `{ "<plural>": [...], "count": N }`.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub count: i64,
}

impl<T: Entity> Serialize for Page<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(T::PLURAL, &self.items)?;
        map.serialize_entry("count", &self.count)?;
        map.end()
    }
}

pub struct CrudRepository<T> {
    pool: PgPool,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for CrudRepository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> CrudRepository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub async fn create(&self, draft: &T::Create) -> Result<T, AppError> {
        T::insert(draft)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::from_unique(e, T::UNIQUE_LABEL))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<T, AppError> {
        fetch_by_id::<T, _>(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound(T::NAME))
    }

    pub async fn get_list(&self, params: &ListParams) -> Result<Page<T>, AppError> {
        // Mesmo filtro na contagem e na página.
        let pattern = params
            .search_pattern()
            .filter(|_| !T::SEARCH_COLUMNS.is_empty());
        let searching = pattern.is_some();

        let count_sql = count_sql(T::TABLE, T::SEARCH_COLUMNS, searching);
        let page_sql = page_sql(T::TABLE, T::SEARCH_COLUMNS, searching);

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut page_query = sqlx::query_as::<_, T>(&page_sql);
        if let Some(pattern) = &pattern {
            count_query = count_query.bind(pattern);
            page_query = page_query.bind(pattern);
        }

        let count = count_query.fetch_one(&self.pool).await?;
        let items = page_query
            .bind(params.limit)
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page { items, count })
    }

    pub async fn update(&self, id: Uuid, patch: &T::Update) -> Result<T, AppError> {
        T::update(id, patch)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::from_unique(e, T::UNIQUE_LABEL))?
            .ok_or(AppError::NotFound(T::NAME))
    }

    // Exclusão lógica: a segunda chamada para o mesmo id já não encontra nada.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let sql = delete_sql(T::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(T::NAME));
        }
        Ok(())
    }
}

// Busca por id em qualquer executor (pool ou transação).
pub async fn fetch_by_id<'e, T, E>(executor: E, id: Uuid) -> Result<Option<T>, AppError>
where
    T: Entity,
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "SELECT * FROM {} WHERE id = $1 AND deleted_at IS NULL",
        T::TABLE
    );
    let row = sqlx::query_as::<_, T>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

// ---
// Montagem do SQL (nomes de tabela/coluna são constantes, valores sempre via bind)
// ---

fn where_clause(columns: &[&str], searching: bool) -> String {
    let mut clause = String::from("WHERE deleted_at IS NULL");
    if searching {
        let ors: Vec<String> = columns
            .iter()
            .map(|col| format!("{col} ILIKE $1"))
            .collect();
        clause.push_str(&format!(" AND ({})", ors.join(" OR ")));
    }
    clause
}

fn count_sql(table: &str, columns: &[&str], searching: bool) -> String {
    format!(
        "SELECT COUNT(*) FROM {table} {}",
        where_clause(columns, searching)
    )
}

fn page_sql(table: &str, columns: &[&str], searching: bool) -> String {
    let (limit, offset) = if searching { (2, 3) } else { (1, 2) };
    format!(
        "SELECT * FROM {table} {} ORDER BY created_at ASC, id ASC LIMIT ${limit} OFFSET ${offset}",
        where_clause(columns, searching)
    )
}

fn delete_sql(table: &str) -> String {
    format!("UPDATE {table} SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL")
}
