use crate::database::connection::{DatabaseError, PgPooledConnection};
use crate::database::models::{Company, NewCompany};
use crate::database::schema::companies;
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;

/// Company repository trait - defines interface for company operations
pub trait CompanyRepository: Send + Sync {
    /// Find company by the provider's stable identifier
    fn find_by_external_id(&self, external_id: &str) -> Result<Option<Company>, DatabaseError>;

    /// Insert a new company
    fn insert(&self, new_company: NewCompany) -> Result<Company, DatabaseError>;

    /// Update the display name if it differs from the stored value
    ///
    /// Returns true only when a write actually happened, so sync passes can
    /// count real changes.
    fn update_name_if_changed(&self, id: i64, name: &str) -> Result<bool, DatabaseError>;

    /// Get all companies
    fn get_all(&self) -> Result<Vec<Company>, DatabaseError>;
}

/// Concrete implementation of CompanyRepository backed by PostgreSQL
pub struct CompanyRepositoryImpl {
    get_conn: Arc<dyn Fn() -> Result<PgPooledConnection, DatabaseError> + Send + Sync>,
}

impl CompanyRepositoryImpl {
    /// Create new company repository with connection provider
    pub fn new<F>(get_conn: F) -> Self
    where
        F: Fn() -> Result<PgPooledConnection, DatabaseError> + Send + Sync + 'static,
    {
        Self {
            get_conn: Arc::new(get_conn),
        }
    }
}

impl CompanyRepository for CompanyRepositoryImpl {
    fn find_by_external_id(&self, external_id: &str) -> Result<Option<Company>, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        companies::table
            .filter(companies::external_id.eq(external_id))
            .first::<Company>(&mut conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    fn insert(&self, new_company: NewCompany) -> Result<Company, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        diesel::insert_into(companies::table)
            .values(&new_company)
            .get_result::<Company>(&mut conn)
            .map_err(DatabaseError::from)
    }

    fn update_name_if_changed(&self, id: i64, name: &str) -> Result<bool, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        let updated = diesel::update(companies::table)
            .filter(companies::id.eq(id))
            .filter(companies::name.ne(name))
            .set((
                companies::name.eq(name),
                companies::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    fn get_all(&self) -> Result<Vec<Company>, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        companies::table
            .order(companies::name.asc())
            .load::<Company>(&mut conn)
            .map_err(DatabaseError::from)
    }
}

#[cfg(test)]
mod tests {
    // Repository behaviour is exercised against mock implementations in the
    // sync and scheduler tests; the diesel impl requires a live database.
    #[test]
    #[ignore]
    fn test_company_repository_against_database() {}
}
