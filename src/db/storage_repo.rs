// src/db/storage_repo.rs

use sqlx::{postgres::PgArguments, query::QueryAs, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::crud_repo::Entity,
    models::{
        income::{CreateIncome, CreateIncomeProduct, Income, IncomeProduct, UpdateIncome, UpdateIncomeProduct},
        product::Product,
        storage::{
            CreateStorage, NewStorageTransaction, Storage, StorageTransaction, UpdateStorage,
            UpdateStorageTransaction,
        },
    },
};

// --- 1. Estoque (um registro por produto/filial) ---
impl Entity for Storage {
    const TABLE: &'static str = "storages";
    const NAME: &'static str = "Estoque";
    const PLURAL: &'static str = "storages";
    const UNIQUE_LABEL: &'static str = "Estoque deste produto nesta filial";

    type Create = CreateStorage;
    type Update = UpdateStorage;

    fn insert(draft: &CreateStorage) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            "INSERT INTO storages (product_id, branch_id, count) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(draft.product_id)
        .bind(draft.branch_id)
        .bind(draft.count)
    }

    fn update(id: Uuid, patch: &UpdateStorage) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            UPDATE storages SET product_id = $2, branch_id = $3, count = $4, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.product_id)
        .bind(patch.branch_id)
        .bind(patch.count)
    }
}

/// `SELECT … FOR UPDATE` no estoque do produto na filial.
pub async fn lock_storage<'e, E>(
    executor: E,
    product_id: Uuid,
    branch_id: Uuid,
) -> Result<Option<Storage>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let storage = sqlx::query_as::<_, Storage>(
        r#"
        SELECT * FROM storages
        WHERE product_id = $1 AND branch_id = $2 AND deleted_at IS NULL
        FOR UPDATE
        "#,
    )
    .bind(product_id)
    .bind(branch_id)
    .fetch_optional(executor)
    .await?;
    Ok(storage)
}

/// Baixa condicional: só decrementa se ainda houver saldo (compare-and-swap).
/// `None` significa que o saldo não cobria a quantidade.
pub async fn decrement_storage<'e, E>(
    executor: E,
    storage_id: Uuid,
    quantity: i32,
) -> Result<Option<Storage>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let storage = sqlx::query_as::<_, Storage>(
        r#"
        UPDATE storages SET count = count - $2, updated_at = now()
        WHERE id = $1 AND count >= $2 AND deleted_at IS NULL
        RETURNING *
        "#,
    )
    .bind(storage_id)
    .bind(quantity)
    .fetch_optional(executor)
    .await?;
    Ok(storage)
}

pub async fn find_product_by_barcode<'e, E>(
    executor: E,
    barcode: &str,
) -> Result<Option<Product>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let product = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE barcode = $1 AND deleted_at IS NULL",
    )
    .bind(barcode)
    .fetch_optional(executor)
    .await?;
    Ok(product)
}

// --- 2. Movimentações de estoque ---
impl Entity for StorageTransaction {
    const TABLE: &'static str = "storage_transactions";
    const NAME: &'static str = "Movimentação de estoque";
    const PLURAL: &'static str = "storage_transactions";
    const SEARCH_COLUMNS: &'static [&'static str] = &["storage_transaction_type::text"];

    type Create = NewStorageTransaction;
    type Update = UpdateStorageTransaction;

    fn insert(draft: &NewStorageTransaction) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            INSERT INTO storage_transactions (
                staff_id, product_id, branch_id, storage_transaction_type, price, quantity
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(draft.staff_id)
        .bind(draft.product_id)
        .bind(draft.branch_id)
        .bind(draft.storage_transaction_type)
        .bind(draft.price)
        .bind(draft.quantity)
    }

    fn update(
        id: Uuid,
        patch: &UpdateStorageTransaction,
    ) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            UPDATE storage_transactions
            SET staff_id = $2, product_id = $3, branch_id = $4,
                storage_transaction_type = $5, price = $6, quantity = $7, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.staff_id)
        .bind(patch.product_id)
        .bind(patch.branch_id)
        .bind(patch.storage_transaction_type)
        .bind(patch.price)
        .bind(patch.quantity)
    }
}

// --- 3. Entradas de mercadoria ---
impl Entity for Income {
    const TABLE: &'static str = "incomes";
    const NAME: &'static str = "Entrada";
    const PLURAL: &'static str = "incomes";

    type Create = CreateIncome;
    type Update = UpdateIncome;

    fn insert(draft: &CreateIncome) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as("INSERT INTO incomes (branch_id, price) VALUES ($1, $2) RETURNING *")
            .bind(draft.branch_id)
            .bind(draft.price)
    }

    fn update(id: Uuid, patch: &UpdateIncome) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            UPDATE incomes SET branch_id = $2, price = $3, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.branch_id)
        .bind(patch.price)
    }
}

impl Entity for IncomeProduct {
    const TABLE: &'static str = "income_products";
    const NAME: &'static str = "Item da entrada";
    const PLURAL: &'static str = "income_products";

    type Create = CreateIncomeProduct;
    type Update = UpdateIncomeProduct;

    fn insert(draft: &CreateIncomeProduct) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            INSERT INTO income_products (income_id, product_id, price, count)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(draft.income_id)
        .bind(draft.product_id)
        .bind(draft.price)
        .bind(draft.count)
    }

    fn update(id: Uuid, patch: &UpdateIncomeProduct) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            UPDATE income_products
            SET income_id = $2, product_id = $3, price = $4, count = $5, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.income_id)
        .bind(patch.product_id)
        .bind(patch.price)
        .bind(patch.count)
    }
}
