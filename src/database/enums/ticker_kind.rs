use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::Pg;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use utoipa::ToSchema;

/// Instrument classification enumeration
///
/// Closed set of instrument kinds the registry accepts. Unknown kind strings
/// coming from the provider or the database are rejected, never coerced.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum TickerKind {
    Stock,
    Fund,
    Etf,
}

impl TickerKind {
    /// Convert enum to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TickerKind::Stock => "stock",
            TickerKind::Fund => "fund",
            TickerKind::Etf => "etf",
        }
    }

    /// Parse string to TickerKind enum
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "stock" => Some(TickerKind::Stock),
            "fund" => Some(TickerKind::Fund),
            "etf" => Some(TickerKind::Etf),
            _ => None,
        }
    }

    /// Get all kind variants
    pub fn all() -> Vec<Self> {
        vec![TickerKind::Stock, TickerKind::Fund, TickerKind::Etf]
    }
}

impl fmt::Display for TickerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Diesel ToSql implementation - convert Rust enum to SQL TEXT
impl ToSql<Text, Pg> for TickerKind {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

// Diesel FromSql implementation - convert SQL TEXT to Rust enum
impl FromSql<Text, Pg> for TickerKind {
    fn from_sql(bytes: <Pg as diesel::backend::Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let text = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        TickerKind::from_str(&text)
            .ok_or_else(|| format!("Invalid ticker kind value: {}", text).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_as_str() {
        assert_eq!(TickerKind::Stock.as_str(), "stock");
        assert_eq!(TickerKind::Fund.as_str(), "fund");
        assert_eq!(TickerKind::Etf.as_str(), "etf");
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(TickerKind::from_str("stock"), Some(TickerKind::Stock));
        assert_eq!(TickerKind::from_str("etf"), Some(TickerKind::Etf));
        assert_eq!(TickerKind::from_str("bond"), None);
        assert_eq!(TickerKind::from_str("STOCK"), None);
    }

    #[test]
    fn test_kind_serde_lowercase() {
        let json = serde_json::to_string(&TickerKind::Etf).unwrap();
        assert_eq!(json, "\"etf\"");

        let parsed: TickerKind = serde_json::from_str("\"fund\"").unwrap();
        assert_eq!(parsed, TickerKind::Fund);

        let bad: Result<TickerKind, _> = serde_json::from_str("\"warrant\"");
        assert!(bad.is_err());
    }
}
