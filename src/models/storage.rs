// src/models/storage.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::validate_not_negative;

// --- Estoque por (produto, filial) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Storage {
    pub id: Uuid,
    pub product_id: Uuid,
    pub branch_id: Uuid,
    pub count: i32, // Nunca negativo
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStorage {
    pub product_id: Uuid,
    pub branch_id: Uuid,
    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub count: i32,
}

pub type UpdateStorage = CreateStorage;

// --- Movimentações de estoque (auditoria) ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "storage_transaction_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StorageTransactionType {
    Minus, // Saída por venda
    Plus,  // Reposição
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StorageTransaction {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub product_id: Uuid,
    pub branch_id: Uuid,
    pub storage_transaction_type: StorageTransactionType,
    pub price: Decimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewStorageTransaction {
    pub staff_id: Uuid,
    pub product_id: Uuid,
    pub branch_id: Uuid,
    pub storage_transaction_type: StorageTransactionType,
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,
    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub quantity: i32,
}

pub type UpdateStorageTransaction = NewStorageTransaction;
