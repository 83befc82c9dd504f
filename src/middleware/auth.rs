// src/middleware/auth.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::staff::{Staff, StaffRole},
    services::checkout_service::SaleContext,
};

// Extrator do funcionário autenticado (Authorization: Bearer <jwt>).
// O token é validado e o funcionário recarregado do banco a cada requisição.
pub struct AuthenticatedStaff(pub Staff);

impl AuthenticatedStaff {
    /// O caixa e a filial de uma venda feita por este funcionário.
    /// Só caixas abrem ou alteram vendas.
    pub fn sale_context(&self) -> Result<SaleContext, AppError> {
        if self.0.role != StaffRole::Cashier {
            return Err(AppError::Forbidden(
                "Apenas caixas podem registrar vendas.".into(),
            ));
        }

        Ok(SaleContext {
            cashier_id: self.0.id,
            branch_id: self.0.branch_id,
        })
    }
}

impl FromRequestParts<AppState> for AuthenticatedStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::InvalidToken)?;

        let staff = state.auth_service.validate_token(bearer.token()).await?;
        Ok(AuthenticatedStaff(staff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn staff(role: StaffRole) -> AuthenticatedStaff {
        AuthenticatedStaff(Staff {
            id: Uuid::new_v4(),
            branch_id: Uuid::new_v4(),
            tarif_id: Uuid::new_v4(),
            role,
            name: "Ana".into(),
            balance: Decimal::ZERO,
            birth_date: None,
            gender: None,
            login: "ana".into(),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    #[test]
    fn cashier_sells_from_own_branch() {
        let cashier = staff(StaffRole::Cashier);
        let ctx = cashier.sale_context().unwrap();

        assert_eq!(ctx.cashier_id, cashier.0.id);
        assert_eq!(ctx.branch_id, cashier.0.branch_id);
    }

    #[test]
    fn shop_assistant_cannot_register_sales() {
        let err = staff(StaffRole::ShopAssistant).sale_context().unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
