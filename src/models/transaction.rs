// src/models/transaction.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::validate_not_negative;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Topup,
    Withdraw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_source", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionSource {
    Sales,
    Bonus,
}

// Lançamento no saldo de um funcionário.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub sale_id: Option<Uuid>,
    pub staff_id: Uuid,
    pub transaction_type: TransactionType,
    pub source_type: TransactionSource,
    pub amount: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTransaction {
    pub sale_id: Option<Uuid>,
    pub staff_id: Uuid,
    pub transaction_type: TransactionType,
    pub source_type: TransactionSource,
    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
}

pub type UpdateTransaction = NewTransaction;
