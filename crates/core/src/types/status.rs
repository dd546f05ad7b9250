//! Status enums for sessions and catalog items.

use serde::{Deserialize, Serialize};

/// Role carried by a session.
///
/// Serialized as the lowercase strings the persisted session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including catalog administration.
    Admin,
    /// Standard shopper.
    #[default]
    User,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Stock badge shown next to an item in the admin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

impl StockStatus {
    /// Highest stock count still reported as low.
    pub const LOW_STOCK_THRESHOLD: u32 = 5;

    /// Classify a stock count.
    #[must_use]
    pub const fn from_stock(stock: u32) -> Self {
        match stock {
            0 => Self::OutOfStock,
            n if n <= Self::LOW_STOCK_THRESHOLD => Self::LowStock,
            _ => Self::InStock,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OutOfStock => "out of stock",
            Self::LowStock => "low stock",
            Self::InStock => "in stock",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"user\"").unwrap(),
            Role::User
        );
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_stock_status_thresholds() {
        assert_eq!(StockStatus::from_stock(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_stock(1), StockStatus::LowStock);
        assert_eq!(StockStatus::from_stock(5), StockStatus::LowStock);
        assert_eq!(StockStatus::from_stock(6), StockStatus::InStock);
    }
}
