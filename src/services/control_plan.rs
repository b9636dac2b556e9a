use chrono::Utc;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::quality_parameter::{QualityParameter, QualityParameterListQuery};
use crate::forms::control_plan::{AddQualityParameterForm, EditQualityParameterForm};
use crate::repository::{QualityParameterReader, QualityParameterWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the control plan page.
#[derive(Debug, Default, Deserialize)]
pub struct ControlPlanQuery {
    /// Optional search applied to parameter names.
    pub search: Option<String>,
    /// Page number requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the control plan template.
pub struct ControlPlanPageData {
    pub parameters: Paginated<QualityParameter>,
    pub search: Option<String>,
    /// Whether the add/edit forms are shown.
    pub can_edit: bool,
}

/// Lists the control plan. Readable by every authenticated identity.
pub fn load_control_plan<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ControlPlanQuery,
) -> ServiceResult<ControlPlanPageData>
where
    R: QualityParameterReader + ?Sized,
{
    let ControlPlanQuery { search, page } = query;
    let page = page.unwrap_or(1);

    let mut list_query = QualityParameterListQuery::new();

    if let Some(term) = search.as_ref().filter(|term| !term.trim().is_empty()) {
        list_query = list_query.search(term.trim());
    }

    list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, parameters) = repo
        .list_quality_parameters(list_query)
        .map_err(ServiceError::from)?;
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let parameters = Paginated::new(parameters, page, total_pages);

    Ok(ControlPlanPageData {
        parameters,
        search,
        can_edit: check_role(SERVICE_ACCESS_ROLE, &user.roles),
    })
}

/// Returns the whole control plan ordered by name.
pub fn list_quality_parameters<R>(repo: &R) -> ServiceResult<Vec<QualityParameter>>
where
    R: QualityParameterReader + ?Sized,
{
    let (_, parameters) = repo
        .list_quality_parameters(QualityParameterListQuery::new())
        .map_err(ServiceError::from)?;

    Ok(parameters)
}

/// Adds a parameter to the control plan. Administrators only.
pub fn create_quality_parameter<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddQualityParameterForm,
) -> ServiceResult<QualityParameter>
where
    R: QualityParameterWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let new_parameter = form
        .into_new_quality_parameter()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_quality_parameter(&new_parameter)
        .map_err(ServiceError::from)
}

/// Updates a parameter in place. Administrators only.
pub fn modify_quality_parameter<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EditQualityParameterForm,
) -> ServiceResult<QualityParameter>
where
    R: QualityParameterWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let parameter_id = form.parameter_id;
    let update = form
        .into_update_quality_parameter(Utc::now().naive_utc())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_quality_parameter(parameter_id, &update)
        .map_err(ServiceError::from)
}
