// src/models/sale.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::validate_not_negative;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    #[default]
    Cash,
    Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sale_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    InProgress,
    Success,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sale {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub cashier_id: Uuid,
    pub shop_assistant_id: Option<Uuid>,
    pub payment_type: PaymentType,
    pub status: SaleStatus,
    pub client_name: Option<String>,
    // Soma dos cestos (baskets) da venda
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Casca da venda: nasce em andamento e com preço zero.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewSale {
    pub branch_id: Uuid,
    pub cashier_id: Uuid,
    pub shop_assistant_id: Option<Uuid>,
    #[serde(default)]
    pub payment_type: PaymentType,
    pub client_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSale {
    pub shop_assistant_id: Option<Uuid>,
    pub payment_type: PaymentType,
    pub status: SaleStatus,
    pub client_name: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,
}

// ---
// Checkout
// ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LineItem {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub quantity: i32,
}

// `/start_sale` aceita a lista pura ou o formulário completo.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StartSaleBody {
    Items(Vec<LineItem>),
    Form {
        items: Vec<LineItem>,
        #[serde(default)]
        payment_type: PaymentType,
        #[serde(default)]
        client_name: Option<String>,
        #[serde(default)]
        shop_assistant_id: Option<Uuid>,
    },
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(from = "StartSaleBody")]
pub struct StartSaleRequest {
    #[validate(length(min = 1, message = "A venda precisa de ao menos um item."), nested)]
    pub items: Vec<LineItem>,
    pub payment_type: PaymentType,
    pub client_name: Option<String>,
    pub shop_assistant_id: Option<Uuid>,
}

impl From<StartSaleBody> for StartSaleRequest {
    fn from(body: StartSaleBody) -> Self {
        match body {
            StartSaleBody::Items(items) => Self {
                items,
                payment_type: PaymentType::Cash,
                client_name: None,
                shop_assistant_id: None,
            },
            StartSaleBody::Form {
                items,
                payment_type,
                client_name,
                shop_assistant_id,
            } => Self {
                items,
                payment_type,
                client_name,
                shop_assistant_id,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartSaleBarcodeRequest {
    pub sale_id: Uuid,
    #[validate(length(min = 1, message = "O código de barras é obrigatório."))]
    pub barcode: String,
    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarcodeSaleReceipt {
    pub product_name: String,
    pub product_quantity: i32,
    pub product_price: Decimal,
    pub total_sum: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_list_defaults_to_cash() {
        let id = Uuid::new_v4();
        let req: StartSaleRequest =
            serde_json::from_value(json!([{ "product_id": id, "quantity": 2 }])).unwrap();

        assert_eq!(req.items, vec![LineItem { product_id: id, quantity: 2 }]);
        assert_eq!(req.payment_type, PaymentType::Cash);
        assert!(req.client_name.is_none());
        assert!(req.shop_assistant_id.is_none());
    }

    #[test]
    fn form_carries_payment_and_assistant() {
        let assistant = Uuid::new_v4();
        let req: StartSaleRequest = serde_json::from_value(json!({
            "items": [{ "product_id": Uuid::new_v4(), "quantity": 1 }],
            "payment_type": "card",
            "client_name": "Maria",
            "shop_assistant_id": assistant,
        }))
        .unwrap();

        assert_eq!(req.payment_type, PaymentType::Card);
        assert_eq!(req.client_name.as_deref(), Some("Maria"));
        assert_eq!(req.shop_assistant_id, Some(assistant));
    }

    #[test]
    fn empty_cart_and_zero_quantity_are_invalid() {
        let req: StartSaleRequest = serde_json::from_value(json!([])).unwrap();
        assert!(req.validate().is_err());

        let req: StartSaleRequest =
            serde_json::from_value(json!([{ "product_id": Uuid::new_v4(), "quantity": 0 }]))
                .unwrap();
        assert!(req.validate().is_err());
    }
}
