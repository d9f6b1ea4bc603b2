//! Cart line domain entity and drink options

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::errors::DomainError;

/// Highest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: i32 = 99;

/// Jelly topping added to the drink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Topping {
    #[default]
    None,
    BlackJelly,
    WhiteJelly,
    SevenColors,
}

impl Topping {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::BlackJelly => "black_jelly",
            Self::WhiteJelly => "white_jelly",
            Self::SevenColors => "seven_colors",
        }
    }
}

impl FromStr for Topping {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "black_jelly" => Ok(Self::BlackJelly),
            "white_jelly" => Ok(Self::WhiteJelly),
            "seven_colors" => Ok(Self::SevenColors),
            other => Err(DomainError::Validation(format!("Unknown topping: {}", other))),
        }
    }
}

/// Amount of ice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Ice {
    Less,
    #[default]
    General,
    Many,
}

impl Ice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Less => "less",
            Self::General => "general",
            Self::Many => "many",
        }
    }
}

impl FromStr for Ice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "less" => Ok(Self::Less),
            "general" => Ok(Self::General),
            "many" => Ok(Self::Many),
            other => Err(DomainError::Validation(format!("Unknown ice level: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CupSize {
    Small,
    #[default]
    Regular,
    Big,
}

impl CupSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Regular => "regular",
            Self::Big => "big",
        }
    }
}

impl FromStr for CupSize {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Self::Small),
            "regular" => Ok(Self::Regular),
            "big" => Ok(Self::Big),
            other => Err(DomainError::Validation(format!("Unknown cup size: {}", other))),
        }
    }
}

/// How a drink is configured. Sugar is a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct DrinkOptions {
    #[serde(default)]
    pub topping: Topping,
    #[serde(default = "default_sugar")]
    pub sugar: u8,
    #[serde(default)]
    pub ice: Ice,
    #[serde(default)]
    pub size: CupSize,
}

fn default_sugar() -> u8 {
    100
}

impl Default for DrinkOptions {
    fn default() -> Self {
        Self {
            topping: Topping::default(),
            sugar: default_sugar(),
            ice: Ice::default(),
            size: CupSize::default(),
        }
    }
}

impl DrinkOptions {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.sugar > 100 {
            return Err(DomainError::Validation(format!(
                "Sugar must be between 0 and 100, got {}",
                self.sugar
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DrinkOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cup, {}% sugar, {} ice, topping {}",
            self.size.as_str(),
            self.sugar,
            self.ice.as_str(),
            self.topping.as_str()
        )
    }
}

/// Identity of a configured item inside one cart.
///
/// Two lines of the same user with equal fingerprints are the same item and
/// must never both be active.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionFingerprint {
    pub product_id: String,
    pub options: DrinkOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartLineStatus {
    #[default]
    Active,
    /// Consumed by an order; hidden from the cart.
    CheckedOut,
}

impl fmt::Display for CartLineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::CheckedOut => write!(f, "checked_out"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CartLine {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub options: DrinkOptions,
    pub quantity: i32,
    pub status: CartLineStatus,
    pub order_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartLine {
    pub fn fingerprint(&self) -> OptionFingerprint {
        OptionFingerprint {
            product_id: self.product_id.clone(),
            options: self.options,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == CartLineStatus::Active
    }
}

/// Clamp a requested quantity into the accepted range.
///
/// Anything below one becomes one; above the line maximum is an error.
pub fn normalize_quantity(requested: i64) -> Result<i32, DomainError> {
    if requested > MAX_LINE_QUANTITY as i64 {
        return Err(DomainError::Validation(format!(
            "Quantity must not exceed {}",
            MAX_LINE_QUANTITY
        )));
    }
    Ok(requested.max(1) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_to_regular_cup_without_topping() {
        let options = DrinkOptions::default();
        assert_eq!(options.topping, Topping::None);
        assert_eq!(options.ice, Ice::General);
        assert_eq!(options.size, CupSize::Regular);
        assert_eq!(options.sugar, 100);
    }

    #[test]
    fn sugar_above_hundred_is_rejected() {
        let options = DrinkOptions {
            sugar: 120,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn options_parse_from_wire_names() {
        assert_eq!("seven_colors".parse::<Topping>().unwrap(), Topping::SevenColors);
        assert_eq!("many".parse::<Ice>().unwrap(), Ice::Many);
        assert_eq!("big".parse::<CupSize>().unwrap(), CupSize::Big);
        assert!("huge".parse::<CupSize>().is_err());
    }

    #[test]
    fn quantity_is_clamped_to_one() {
        assert_eq!(normalize_quantity(0).unwrap(), 1);
        assert_eq!(normalize_quantity(-4).unwrap(), 1);
        assert_eq!(normalize_quantity(7).unwrap(), 7);
        assert!(normalize_quantity(100).is_err());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: DrinkOptions = serde_json::from_str(r#"{"ice":"less"}"#).unwrap();
        assert_eq!(options.ice, Ice::Less);
        assert_eq!(options.size, CupSize::Regular);
        assert_eq!(options.sugar, 100);
    }
}
