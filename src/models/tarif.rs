// src/models/tarif.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{common::error::AppError, models::validate_not_negative};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TarifType {
    Percent, // A taxa guardada é uma fração (0.05 = 5%)
    Fixed,   // Bônus fixo por venda
}

impl TarifType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TarifType::Percent => "percent",
            TarifType::Fixed => "fixed",
        }
    }
}

impl fmt::Display for TarifType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TarifType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percent" => Ok(TarifType::Percent),
            "fixed" => Ok(TarifType::Fixed),
            other => Err(AppError::InvalidTarifType(other.to_string())),
        }
    }
}

// O tipo fica como texto na tabela; só é interpretado na hora de calcular a comissão.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tarif {
    pub id: Uuid,
    pub name: String,
    pub tarif_type: String,
    pub amount_for_cash: Decimal,
    pub amount_for_card: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tarif {
    pub fn kind(&self) -> Result<TarifType, AppError> {
        self.tarif_type.parse()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_percent_rates"))]
pub struct CreateTarif {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub tarif_type: TarifType,

    #[validate(custom(function = "validate_not_negative"))]
    pub amount_for_cash: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    pub amount_for_card: Decimal,
}

pub type UpdateTarif = CreateTarif;

// Regra: tarifa percentual guarda frações, então nada acima de 1 (100%).
fn validate_percent_rates(tarif: &CreateTarif) -> Result<(), ValidationError> {
    if tarif.tarif_type == TarifType::Percent
        && (tarif.amount_for_cash > Decimal::ONE || tarif.amount_for_card > Decimal::ONE)
    {
        let mut err = ValidationError::new("percent_rate");
        err.message = Some("Tarifa percentual usa frações entre 0 e 1 (ex: 0.05 para 5%).".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(tarif_type: TarifType, cash: &str, card: &str) -> CreateTarif {
        CreateTarif {
            name: "Padrão".into(),
            tarif_type,
            amount_for_cash: cash.parse().unwrap(),
            amount_for_card: card.parse().unwrap(),
        }
    }

    #[test]
    fn parses_known_types() {
        assert_eq!("percent".parse::<TarifType>().unwrap(), TarifType::Percent);
        assert_eq!("fixed".parse::<TarifType>().unwrap(), TarifType::Fixed);
    }

    #[test]
    fn unknown_type_is_invalid_tarif_type() {
        let err = "bonus".parse::<TarifType>().unwrap_err();
        assert!(matches!(err, AppError::InvalidTarifType(ref t) if t == "bonus"));
    }

    #[test]
    fn percent_rates_must_be_fractions() {
        assert!(draft(TarifType::Percent, "0.05", "0.03").validate().is_ok());
        assert!(draft(TarifType::Percent, "5", "0.03").validate().is_err());
        // Bônus fixo pode ser qualquer quantia
        assert!(draft(TarifType::Fixed, "20", "25").validate().is_ok());
    }
}
