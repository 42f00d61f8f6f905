//! Wire types for the positions endpoint.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::{Number, Value};
use std::ops::Add;

/// Display value used when a position has no legal entity.
pub const MISSING_TEXT: &str = "N/A";

/// A numeric wire value, kept exact while it is an integer.
///
/// Integer amounts add without rounding; once a fractional value joins a
/// sum, the result continues as `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Integer(i128),
    Float(f64),
}

impl Amount {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Float(x) => x,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Self::Integer(i) => i == 0,
            Self::Float(x) => x == 0.0,
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::Integer(0)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Integer(a), Self::Integer(b)) => a
                .checked_add(b)
                .map(Self::Integer)
                .unwrap_or_else(|| Self::Float(a as f64 + b as f64)),
            (a, b) => Self::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl From<&Number> for Amount {
    fn from(n: &Number) -> Self {
        if let Some(i) = n.as_i64() {
            Self::Integer(i.into())
        } else if let Some(u) = n.as_u64() {
            Self::Integer(u.into())
        } else {
            Self::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Number::deserialize(deserializer).map(|n| Self::from(&n))
    }
}

/// A single position as reported by the backend.
///
/// Every field is optional on the wire; `null` and absent are treated alike.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Position {
    /// Account grouping the position is held under.
    pub legal_entity: Option<String>,

    /// Number of shares held.
    #[serde(rename = "qty")]
    pub quantity: Option<Amount>,

    pub market_value: Option<Amount>,

    #[serde(rename = "price")]
    pub current_price: Option<Amount>,

    #[serde(rename = "avgPrice")]
    pub average_price: Option<Amount>,

    pub unrealized_pnl: Option<Amount>,
}

impl Position {
    pub fn legal_entity(&self) -> &str {
        self.legal_entity.as_deref().unwrap_or(MISSING_TEXT)
    }

    pub fn quantity(&self) -> Amount {
        self.quantity.unwrap_or_default()
    }

    pub fn market_value(&self) -> Amount {
        self.market_value.unwrap_or_default()
    }

    pub fn current_price(&self) -> Amount {
        self.current_price.unwrap_or_default()
    }

    pub fn average_price(&self) -> Amount {
        self.average_price.unwrap_or_default()
    }

    pub fn unrealized_pnl(&self) -> Amount {
        self.unrealized_pnl.unwrap_or_default()
    }

    /// Percentage gain of the current price over the average cost.
    ///
    /// `None` when the average price is zero or missing.
    pub fn pnl_percent(&self) -> Option<f64> {
        match self.average_price {
            Some(avg) if !avg.is_zero() => {
                Some((self.current_price().as_f64() / avg.as_f64() - 1.0) * 100.0)
            }
            _ => None,
        }
    }
}

/// A backend record kept both verbatim and as a typed [`Position`].
///
/// The verbatim JSON is what ends up in the report's raw-data block, so
/// fields the typed view does not know about survive untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRecord {
    pub raw: Value,
    pub position: Position,
}

impl<'de> Deserialize<'de> for PositionRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let position = Position::deserialize(&raw).map_err(de::Error::custom)?;
        Ok(Self { raw, position })
    }
}

impl Serialize for PositionRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.raw.serialize(serializer)
    }
}

/// Body of `GET /query/positions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PositionsResponse {
    #[serde(default)]
    pub success: Option<bool>,

    #[serde(default)]
    pub positions: Vec<PositionRecord>,

    #[serde(default)]
    pub positions_count: Option<u64>,

    #[serde(default)]
    pub error: Option<String>,
}

impl PositionsResponse {
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(false)
    }

    /// Count reported by the backend, or the number of records when absent.
    pub fn count(&self) -> u64 {
        self.positions_count.unwrap_or(self.positions.len() as u64)
    }
}
