pub mod auth;
pub mod basket;
pub mod branch;
pub mod category;
pub mod income;
pub mod product;
pub mod sale;
pub mod staff;
pub mod storage;
pub mod tarif;
pub mod transaction;

use rust_decimal::Decimal;
use validator::ValidationError;

// ---
// Validação Customizada (valores monetários)
// ---
pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_money_is_rejected() {
        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
        assert!(validate_not_negative(&Decimal::new(1999, 2)).is_ok());

        let err = validate_not_negative(&Decimal::new(-1, 0)).unwrap_err();
        assert_eq!(err.code, "range");
    }
}
