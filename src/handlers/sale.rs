// src/handlers/sale.rs

use axum::{extract::State, response::IntoResponse};

use crate::{
    common::{error::AppError, extract::ValidatedJson, response::ApiResponse},
    config::AppState,
    middleware::auth::AuthenticatedStaff,
    models::sale::{StartSaleBarcodeRequest, StartSaleRequest},
};

// POST /start_sale: lista de {product_id, quantity} (ou o formulário completo)
pub async fn start_sale(
    State(app_state): State<AppState>,
    staff: AuthenticatedStaff,
    ValidatedJson(payload): ValidatedJson<StartSaleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state
        .checkout_service
        .start_sale(staff.sale_context()?, payload)
        .await?;

    Ok(ApiResponse::ok(sale))
}

// POST /start_sale_barcode: {sale_id, barcode, quantity}
pub async fn start_sale_barcode(
    State(app_state): State<AppState>,
    staff: AuthenticatedStaff,
    ValidatedJson(payload): ValidatedJson<StartSaleBarcodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let receipt = app_state
        .checkout_service
        .start_sale_barcode(staff.sale_context()?, payload)
        .await?;

    Ok(ApiResponse::ok(receipt))
}
