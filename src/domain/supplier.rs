use chrono::NaiveDateTime;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Supplier record bound one-to-one to an authenticated identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Supplier {
    /// Identity subject issued by the auth service.
    pub id: String,
    /// Display name shown across the UI.
    pub name: String,
    /// Unique contact email, stored lowercase.
    pub email: String,
    /// Timestamp for when the supplier was provisioned.
    pub created_at: NaiveDateTime,
}

/// Payload used to provision a supplier for an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSupplier {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl NewSupplier {
    /// Build a supplier payload. A blank `name` falls back to the email address.
    pub fn new(id: impl Into<String>, name: Option<&str>, email: impl Into<String>) -> Self {
        let email = email.into().trim().to_lowercase();
        let name = name
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| email.clone());

        Self {
            id: id.into().trim().to_string(),
            name,
            email,
        }
    }
}

impl From<&AuthenticatedUser> for NewSupplier {
    fn from(value: &AuthenticatedUser) -> Self {
        NewSupplier::new(value.sub.as_str(), Some(value.name.as_str()), value.email.as_str())
    }
}

/// Query definition used to list suppliers.
#[derive(Debug, Clone, Default)]
pub struct SupplierListQuery {
    /// Optional substring matched against name or email.
    pub search: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl SupplierListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by a search term applied to name or email.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_supplier_falls_back_to_email_for_blank_name() {
        let supplier = NewSupplier::new("abc", Some("   "), " Vendor@Example.com ");

        assert_eq!(supplier.id, "abc");
        assert_eq!(supplier.email, "vendor@example.com");
        assert_eq!(supplier.name, "vendor@example.com");
    }

    #[test]
    fn new_supplier_keeps_provided_name() {
        let supplier = NewSupplier::new("abc", Some(" Acme Castings "), "ops@acme.test");

        assert_eq!(supplier.name, "Acme Castings");
    }

    #[test]
    fn new_supplier_from_authenticated_user() {
        let user = AuthenticatedUser {
            sub: "42".to_string(),
            email: "QA@Vendor.test".to_string(),
            hub_id: 1,
            name: String::new(),
            roles: vec![],
            exp: 0,
        };

        let supplier = NewSupplier::from(&user);

        assert_eq!(supplier.id, "42");
        assert_eq!(supplier.email, "qa@vendor.test");
        assert_eq!(supplier.name, "qa@vendor.test");
    }
}
