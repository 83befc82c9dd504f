// src/models/staff.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "staff_role", rename_all = "snake_case")] // Banco
#[serde(rename_all = "snake_case")] // JSON
pub enum StaffRole {
    Cashier,
    ShopAssistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Staff {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub tarif_id: Uuid,
    pub role: StaffRole,
    pub name: String,
    // Só muda via crédito de comissão no checkout
    pub balance: Decimal,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub login: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para cadastro de um funcionário (senha em texto puro, vira hash no handler)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStaffPayload {
    pub branch_id: Uuid,
    pub tarif_id: Uuid,
    pub role: StaffRole,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,

    #[validate(length(min = 3, message = "O login deve ter no mínimo 3 caracteres."))]
    pub login: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

impl CreateStaffPayload {
    pub fn into_new_staff(self, password_hash: String) -> NewStaff {
        NewStaff {
            branch_id: self.branch_id,
            tarif_id: self.tarif_id,
            role: self.role,
            name: self.name,
            birth_date: self.birth_date,
            gender: self.gender,
            login: self.login,
            password_hash,
        }
    }
}

// O que de fato vai para o INSERT.
#[derive(Debug, Clone)]
pub struct NewStaff {
    pub branch_id: Uuid,
    pub tarif_id: Uuid,
    pub role: StaffRole,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub login: String,
    pub password_hash: String,
}

// Saldo e senha não são editáveis por aqui.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStaff {
    pub branch_id: Uuid,
    pub tarif_id: Uuid,
    pub role: StaffRole,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,

    #[validate(length(min = 3, message = "O login deve ter no mínimo 3 caracteres."))]
    pub login: String,
}
