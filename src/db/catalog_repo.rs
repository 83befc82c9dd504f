// src/db/catalog_repo.rs

use sqlx::{postgres::PgArguments, query::QueryAs, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::crud_repo::{fetch_by_id, Entity},
    models::{
        branch::{Branch, CreateBranch, UpdateBranch},
        category::{Category, CreateCategory, UpdateCategory},
        product::{CreateProduct, Product, UpdateProduct},
        staff::{NewStaff, Staff, UpdateStaff},
        tarif::{CreateTarif, Tarif, UpdateTarif},
    },
};

// --- 1. Filiais ---
impl Entity for Branch {
    const TABLE: &'static str = "branches";
    const NAME: &'static str = "Filial";
    const PLURAL: &'static str = "branches";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "address"];

    type Create = CreateBranch;
    type Update = UpdateBranch;

    fn insert(draft: &CreateBranch) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as("INSERT INTO branches (name, address) VALUES ($1, $2) RETURNING *")
            .bind(&draft.name)
            .bind(&draft.address)
    }

    fn update(id: Uuid, patch: &UpdateBranch) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            UPDATE branches SET name = $2, address = $3, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.address)
    }
}

// --- 2. Categorias ---
impl Entity for Category {
    const TABLE: &'static str = "categories";
    const NAME: &'static str = "Categoria";
    const PLURAL: &'static str = "categories";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name"];

    type Create = CreateCategory;
    type Update = UpdateCategory;

    fn insert(draft: &CreateCategory) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as("INSERT INTO categories (name, parent_id) VALUES ($1, $2) RETURNING *")
            .bind(&draft.name)
            .bind(draft.parent_id)
    }

    fn update(id: Uuid, patch: &UpdateCategory) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            UPDATE categories SET name = $2, parent_id = $3, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(patch.parent_id)
    }
}

// --- 3. Produtos (código de barras único) ---
impl Entity for Product {
    const TABLE: &'static str = "products";
    const NAME: &'static str = "Produto";
    const PLURAL: &'static str = "products";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "barcode"];
    const UNIQUE_LABEL: &'static str = "Código de barras";

    type Create = CreateProduct;
    type Update = UpdateProduct;

    fn insert(draft: &CreateProduct) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            INSERT INTO products (name, price, barcode, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&draft.name)
        .bind(draft.price)
        .bind(&draft.barcode)
        .bind(draft.category_id)
    }

    fn update(id: Uuid, patch: &UpdateProduct) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            UPDATE products
            SET name = $2, price = $3, barcode = $4, category_id = $5, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(patch.price)
        .bind(&patch.barcode)
        .bind(patch.category_id)
    }
}

// --- 4. Tarifas ---
impl Entity for Tarif {
    const TABLE: &'static str = "tarifs";
    const NAME: &'static str = "Tarifa";
    const PLURAL: &'static str = "tarifs";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name"];

    type Create = CreateTarif;
    type Update = UpdateTarif;

    fn insert(draft: &CreateTarif) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            INSERT INTO tarifs (name, tarif_type, amount_for_cash, amount_for_card)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&draft.name)
        .bind(draft.tarif_type.as_str())
        .bind(draft.amount_for_cash)
        .bind(draft.amount_for_card)
    }

    fn update(id: Uuid, patch: &UpdateTarif) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            UPDATE tarifs
            SET name = $2, tarif_type = $3, amount_for_cash = $4, amount_for_card = $5,
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(patch.tarif_type.as_str())
        .bind(patch.amount_for_cash)
        .bind(patch.amount_for_card)
    }
}

// --- 5. Funcionários (login único; o saldo não passa por aqui) ---
impl Entity for Staff {
    const TABLE: &'static str = "staffs";
    const NAME: &'static str = "Funcionário";
    const PLURAL: &'static str = "staffs";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "login"];
    const UNIQUE_LABEL: &'static str = "Login";

    type Create = NewStaff;
    type Update = UpdateStaff;

    fn insert(draft: &NewStaff) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            INSERT INTO staffs (
                branch_id, tarif_id, role, name, birth_date, gender, login, password_hash
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(draft.branch_id)
        .bind(draft.tarif_id)
        .bind(draft.role)
        .bind(&draft.name)
        .bind(draft.birth_date)
        .bind(&draft.gender)
        .bind(&draft.login)
        .bind(&draft.password_hash)
    }

    fn update(id: Uuid, patch: &UpdateStaff) -> QueryAs<'_, Postgres, Self, PgArguments> {
        sqlx::query_as(
            r#"
            UPDATE staffs
            SET branch_id = $2, tarif_id = $3, role = $4, name = $5,
                birth_date = $6, gender = $7, login = $8, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.branch_id)
        .bind(patch.tarif_id)
        .bind(patch.role)
        .bind(&patch.name)
        .bind(patch.birth_date)
        .bind(&patch.gender)
        .bind(&patch.login)
    }
}

// O repositório de funcionários usado pela autenticação.
#[derive(Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um funcionário ativo pelo login
    pub async fn find_by_login(&self, login: &str) -> Result<Option<Staff>, AppError> {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT * FROM staffs WHERE login = $1 AND deleted_at IS NULL",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(staff)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Staff>, AppError> {
        fetch_by_id::<Staff, _>(&self.pool, id).await
    }

    /// Credita a comissão no saldo, dentro da transação do checkout.
    pub async fn credit_balance<'e, E>(
        executor: E,
        staff_id: Uuid,
        amount: rust_decimal::Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE staffs SET balance = balance + $2, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(staff_id)
        .bind(amount)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(Staff::NAME));
        }
        Ok(())
    }
}
