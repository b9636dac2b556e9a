use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::supplier::{NewSupplier, Supplier, SupplierListQuery};
use crate::forms::companies::UploadSuppliersForm;
use crate::repository::{SupplierReader, SupplierWriter};
use crate::services::{ServiceError, ServiceResult};

/// Resolves the supplier of the acting identity, provisioning it on first use.
///
/// Fails with [`ServiceError::Conflict`] when the identity's email already
/// belongs to a different supplier.
pub fn ensure_supplier<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Supplier>
where
    R: SupplierReader + SupplierWriter + ?Sized,
{
    let new_supplier = NewSupplier::from(user);

    if repo
        .create_supplier_if_missing(&new_supplier)
        .map_err(ServiceError::from)?
    {
        log::info!(
            "Provisioned supplier {} for {}",
            new_supplier.id,
            new_supplier.email
        );
    }

    match repo
        .get_supplier_by_id(&new_supplier.id)
        .map_err(ServiceError::from)?
    {
        Some(supplier) => Ok(supplier),
        None => {
            log::warn!(
                "Email {} is already bound to another supplier",
                new_supplier.email
            );
            Err(ServiceError::Conflict)
        }
    }
}

/// Query parameters accepted by the companies page.
#[derive(Debug, Default, Deserialize)]
pub struct CompaniesQuery {
    /// Optional search applied to supplier names and emails.
    pub search: Option<String>,
    /// Page number requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the companies template.
pub struct CompaniesPageData {
    pub suppliers: Paginated<Supplier>,
    pub search: Option<String>,
}

/// Lists every registered supplier. Administrators only.
pub fn load_companies<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CompaniesQuery,
) -> ServiceResult<CompaniesPageData>
where
    R: SupplierReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let CompaniesQuery { search, page } = query;
    let page = page.unwrap_or(1);

    let mut list_query = SupplierListQuery::new();

    if let Some(term) = search.as_ref().filter(|term| !term.trim().is_empty()) {
        list_query = list_query.search(term.trim());
    }

    list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, suppliers) = repo.list_suppliers(list_query).map_err(ServiceError::from)?;
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let suppliers = Paginated::new(suppliers, page, total_pages);

    Ok(CompaniesPageData { suppliers, search })
}

/// Provisions suppliers for identities listed in an uploaded CSV.
///
/// Rows whose id or email already exists are skipped. Returns the number of
/// suppliers created.
pub fn backfill_suppliers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &mut UploadSuppliersForm,
) -> ServiceResult<usize>
where
    R: SupplierWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let new_suppliers = form
        .into_new_suppliers()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if new_suppliers.is_empty() {
        return Ok(0);
    }

    repo.create_suppliers_if_missing(&new_suppliers)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::io::{Seek, SeekFrom, Write};

    use actix_multipart::form::tempfile::TempFile;
    use tempfile::NamedTempFile;

    use crate::repository::mock::MockRepository;

    fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "identity-7".to_string(),
            email: "QA@Vendor.test".to_string(),
            hub_id: 1,
            name: "Vendor QA".to_string(),
            roles: roles.iter().map(|role| (*role).to_string()).collect(),
            exp: 0,
        }
    }

    fn sample_supplier(id: &str, email: &str) -> Supplier {
        Supplier {
            id: id.to_string(),
            name: "Vendor QA".to_string(),
            email: email.to_string(),
            created_at: NaiveDateTime::default(),
        }
    }

    fn upload_form(csv: &str) -> UploadSuppliersForm {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(csv.as_bytes()).expect("write csv file");
        file.as_file_mut()
            .seek(SeekFrom::Start(0))
            .expect("seek to start");

        UploadSuppliersForm {
            csv: TempFile {
                file,
                content_type: None,
                file_name: Some("suppliers.csv".to_string()),
                size: csv.len(),
            },
        }
    }

    #[test]
    fn ensure_supplier_provisions_from_identity() {
        let mut repo = MockRepository::new();
        let user = user_with_roles(&[]);

        repo.expect_create_supplier_if_missing()
            .times(1)
            .withf(|new_supplier| {
                assert_eq!(new_supplier.id, "identity-7");
                assert_eq!(new_supplier.email, "qa@vendor.test");
                assert_eq!(new_supplier.name, "Vendor QA");
                true
            })
            .returning(|_| Ok(true));
        repo.expect_get_supplier_by_id()
            .times(1)
            .withf(|id| id == "identity-7")
            .returning(|id| Ok(Some(sample_supplier(id, "qa@vendor.test"))));

        let supplier = ensure_supplier(&repo, &user).expect("expected supplier");

        assert_eq!(supplier.id, user.sub);
        assert_eq!(supplier.email, "qa@vendor.test");
    }

    #[test]
    fn ensure_supplier_reports_email_conflict() {
        let mut repo = MockRepository::new();
        let user = user_with_roles(&[]);

        repo.expect_create_supplier_if_missing()
            .returning(|_| Ok(false));
        repo.expect_get_supplier_by_id().returning(|_| Ok(None));

        let result = ensure_supplier(&repo, &user);

        assert!(matches!(result, Err(ServiceError::Conflict)));
    }

    #[test]
    fn load_companies_requires_role() {
        let repo = MockRepository::new();
        let user = user_with_roles(&[]);

        let result = load_companies(&repo, &user, CompaniesQuery::default());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn load_companies_passes_search_and_pagination() {
        let mut repo = MockRepository::new();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.expect_list_suppliers()
            .times(1)
            .withf(|query| {
                assert_eq!(query.search.as_deref(), Some("acme"));
                match &query.pagination {
                    Some(pagination) => assert_eq!(pagination.page, 2),
                    None => panic!("expected pagination to be set"),
                }
                true
            })
            .returning(|_| Ok((1, vec![sample_supplier("u-1", "ops@acme.test")])));

        let data = load_companies(
            &repo,
            &user,
            CompaniesQuery {
                search: Some(" acme ".to_string()),
                page: Some(2),
            },
        )
        .expect("expected success");

        assert_eq!(data.search.as_deref(), Some(" acme "));
    }

    #[test]
    fn backfill_requires_role() {
        let repo = MockRepository::new();
        let user = user_with_roles(&[]);
        let mut form = upload_form("id,email\nu-1,ops@acme.test\n");

        let result = backfill_suppliers(&repo, &user, &mut form);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn backfill_creates_missing_suppliers() {
        let mut repo = MockRepository::new();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);
        let mut form = upload_form("id,email,name\nu-1,ops@acme.test,Acme\nu-2,qa@beta.test,\n");

        repo.expect_create_suppliers_if_missing()
            .times(1)
            .withf(|suppliers| {
                assert_eq!(suppliers.len(), 2);
                assert_eq!(suppliers[1].name, "qa@beta.test");
                true
            })
            .returning(|_| Ok(1));

        let created = backfill_suppliers(&repo, &user, &mut form).expect("expected success");

        assert_eq!(created, 1);
    }

    #[test]
    fn backfill_surfaces_parse_errors() {
        let repo = MockRepository::new();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);
        let mut form = upload_form("name\nAcme\n");

        let result = backfill_suppliers(&repo, &user, &mut form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
