// src/services/commission.rs

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    common::error::AppError,
    models::{
        sale::PaymentType,
        tarif::{Tarif, TarifType},
    },
};

/// Comissão de um funcionário sobre uma venda.
///
/// - `percent`: total * taxa (fração), arredondado em centavos.
/// - `fixed`: a própria quantia, independente do total.
///
/// A taxa usada depende da forma de pagamento. Tipo de tarifa desconhecido
/// falha com `InvalidTarifType`.
pub fn commission(
    tarif: &Tarif,
    payment_type: PaymentType,
    sale_total: Decimal,
) -> Result<Decimal, AppError> {
    let rate = match payment_type {
        PaymentType::Cash => tarif.amount_for_cash,
        PaymentType::Card => tarif.amount_for_card,
    };

    let amount = match tarif.kind()? {
        TarifType::Percent => (sale_total * rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        TarifType::Fixed => rate,
    };
    Ok(amount)
}
