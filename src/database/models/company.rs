use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Company entity - the issuer an instrument belongs to
///
/// Keyed locally by a surrogate id; `external_id` is the stable identifier
/// assigned by the market data provider and is unique across companies.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::database::schema::companies)]
pub struct Company {
    /// Local surrogate key
    pub id: i64,

    /// Stable identifier from the market data provider
    pub external_id: String,

    /// Display name (mutable, updated on sync when changed upstream)
    pub name: String,

    /// Timestamp when record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when record was last updated
    pub updated_at: DateTime<Utc>,
}

/// New company for insertion
#[derive(Debug, Clone, Insertable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::database::schema::companies)]
pub struct NewCompany {
    pub external_id: String,
    pub name: String,
}

impl NewCompany {
    pub fn new(external_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_company() {
        let company = NewCompany::new("prov-42", "Acme Holdings");
        assert_eq!(company.external_id, "prov-42");
        assert_eq!(company.name, "Acme Holdings");
    }
}
