// src/db/sales_repo.rs

use rust_decimal::Decimal;
use sqlx::{postgres::PgArguments, query::QueryAs, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::crud_repo::Entity,
    models::{
        basket::{Basket, NewBasket, UpdateBasket},
        sale::{NewSale, Sale, SaleStatus, UpdateSale},
        transaction::{NewTransaction, Transaction, UpdateTransaction},
    },
};

// --- 1. Vendas ---
impl Entity for Sale {
    const TABLE: &'static str = "sales";
    const NAME: &'static str = "Venda";
    const PLURAL: &'static str = "sales";
    const SEARCH_COLUMNS: &'static [&'static str] = &["client_name", "payment_type::text"];

    type Create = NewSale;
    type Update = UpdateSale;

    // A venda sempre nasce 'in_progress' e com preço 0.
    fn insert(draft: &NewSale) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            INSERT INTO sales (
                branch_id, cashier_id, shop_assistant_id, payment_type, client_name,
                status, price
            )
            VALUES ($1, $2, $3, $4, $5, 'in_progress', 0)
            RETURNING *
            "#,
        )
        .bind(draft.branch_id)
        .bind(draft.cashier_id)
        .bind(draft.shop_assistant_id)
        .bind(draft.payment_type)
        .bind(&draft.client_name)
    }

    fn update(id: Uuid, patch: &UpdateSale) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            UPDATE sales
            SET shop_assistant_id = $2, payment_type = $3, status = $4,
                client_name = $5, price = $6, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.shop_assistant_id)
        .bind(patch.payment_type)
        .bind(patch.status)
        .bind(&patch.client_name)
        .bind(patch.price)
    }
}

/// Trava a linha da venda até o fim da transação.
pub async fn lock_sale<'e, E>(executor: E, id: Uuid) -> Result<Option<Sale>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sale = sqlx::query_as::<_, Sale>(
        "SELECT * FROM sales WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(sale)
}

/// Fecha a venda com o total acumulado.
pub async fn finish_sale<'e, E>(executor: E, id: Uuid, price: Decimal) -> Result<Sale, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, Sale>(
        r#"
        UPDATE sales SET price = $2, status = $3, updated_at = now()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(price)
    .bind(SaleStatus::Success)
    .fetch_optional(executor)
    .await?
    .ok_or(AppError::NotFound(Sale::NAME))
}

// --- 2. Cestos (itens da venda) ---
impl Entity for Basket {
    const TABLE: &'static str = "baskets";
    const NAME: &'static str = "Cesto";
    const PLURAL: &'static str = "baskets";

    type Create = NewBasket;
    type Update = UpdateBasket;

    fn insert(draft: &NewBasket) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            INSERT INTO baskets (sale_id, product_id, quantity, price)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(draft.sale_id)
        .bind(draft.product_id)
        .bind(draft.quantity)
        .bind(draft.price)
    }

    fn update(id: Uuid, patch: &UpdateBasket) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            UPDATE baskets
            SET sale_id = $2, product_id = $3, quantity = $4, price = $5, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.sale_id)
        .bind(patch.product_id)
        .bind(patch.quantity)
        .bind(patch.price)
    }
}

// --- 3. Lançamentos financeiros (saldo dos funcionários) ---
impl Entity for Transaction {
    const TABLE: &'static str = "transactions";
    const NAME: &'static str = "Transação";
    const PLURAL: &'static str = "transactions";
    const SEARCH_COLUMNS: &'static [&'static str] = &["description"];

    type Create = NewTransaction;
    type Update = UpdateTransaction;

    fn insert(draft: &NewTransaction) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            INSERT INTO transactions (
                sale_id, staff_id, transaction_type, source_type, amount, description
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(draft.sale_id)
        .bind(draft.staff_id)
        .bind(draft.transaction_type)
        .bind(draft.source_type)
        .bind(draft.amount)
        .bind(&draft.description)
    }

    fn update(id: Uuid, patch: &UpdateTransaction) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            UPDATE transactions
            SET sale_id = $2, staff_id = $3, transaction_type = $4, source_type = $5,
                amount = $6, description = $7, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.sale_id)
        .bind(patch.staff_id)
        .bind(patch.transaction_type)
        .bind(patch.source_type)
        .bind(patch.amount)
        .bind(&patch.description)
    }
}
