// src/models/income.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::validate_not_negative;

// --- Entrada de mercadoria (nota de compra) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Income {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateIncome {
    pub branch_id: Uuid,
    #[serde(default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,
}

pub type UpdateIncome = CreateIncome;

// --- Itens da entrada ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IncomeProduct {
    pub id: Uuid,
    pub income_id: Uuid,
    pub product_id: Uuid,
    pub price: Decimal,
    pub count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateIncomeProduct {
    pub income_id: Uuid,
    pub product_id: Uuid,
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,
    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub count: i32,
}

pub type UpdateIncomeProduct = CreateIncomeProduct;
