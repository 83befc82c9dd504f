// src/models/basket.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::validate_not_negative;

// Um item (linha) de uma venda. price = preço unitário * quantidade.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Basket {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewBasket {
    pub sale_id: Uuid,
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub quantity: i32,
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,
}

pub type UpdateBasket = NewBasket;
