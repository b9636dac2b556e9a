use chrono::{NaiveDate, NaiveDateTime, Utc};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::empty_string_as_none;
use serde::{Deserialize, Serialize};

use crate::domain::measurement::{Measurement, MeasurementListQuery, MeasurementRecord};
use crate::domain::quality_parameter::{
    LimitStatus, QualityParameter, QualityParameterListQuery,
};
use crate::domain::supplier::Supplier;
use crate::forms::measurements::{
    AddMeasurementForm, DeleteMeasurementForm, EditMeasurementForm,
};
use crate::repository::{
    MeasurementReader, MeasurementWriter, QualityParameterReader, SupplierReader, SupplierWriter,
};
use crate::services::suppliers::ensure_supplier;
use crate::services::{ServiceError, ServiceResult};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMAT: &str = "%Y-%m-%d";
const LIST_PATH: &str = "/measurements";

/// Query parameters accepted by the measurements list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeasurementsQuery {
    /// Inclusive lower bound on the measurement time.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub from: Option<String>,
    /// Inclusive upper bound; a bare date covers the whole day.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub parameter_id: Option<String>,
    /// `within` or `outside`; anything empty means all rows.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<String>,
    /// Row currently opened for inline editing.
    pub edit: Option<i32>,
    /// Row awaiting delete confirmation.
    pub confirm_delete: Option<i32>,
}

/// Filter part of [`MeasurementsQuery`], as carried across redirects.
#[derive(Serialize)]
struct ListFilters<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameter_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
}

impl MeasurementsQuery {
    /// Encoded filters without the inline edit or delete state.
    pub fn filters_query_string(&self) -> String {
        let filters = ListFilters {
            from: self.from.as_deref(),
            to: self.to.as_deref(),
            parameter_id: self.parameter_id.as_deref(),
            status: self.status.as_deref(),
        };

        serde_qs::to_string(&filters).unwrap_or_else(|err| {
            log::warn!("Dropping measurement filters from redirect: {err}");
            String::new()
        })
    }

    /// List location with the active filters and no row opened.
    pub fn list_url(&self) -> String {
        match self.filters_query_string() {
            filters if filters.is_empty() => LIST_PATH.to_string(),
            filters => format!("{LIST_PATH}?{filters}"),
        }
    }

    /// List location with the active filters and `measurement_id` open for editing.
    pub fn edit_url(&self, measurement_id: i32) -> String {
        self.row_url("edit", measurement_id)
    }

    /// List location with the active filters asking to confirm a delete.
    pub fn confirm_delete_url(&self, measurement_id: i32) -> String {
        self.row_url("confirm_delete", measurement_id)
    }

    fn row_url(&self, key: &str, measurement_id: i32) -> String {
        match self.filters_query_string() {
            filters if filters.is_empty() => format!("{LIST_PATH}?{key}={measurement_id}"),
            filters => format!("{LIST_PATH}?{filters}&{key}={measurement_id}"),
        }
    }
}

/// Parsed form of [`MeasurementsQuery`] filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementFilters {
    pub measured_from: Option<NaiveDateTime>,
    pub measured_to: Option<NaiveDateTime>,
    pub parameter_id: Option<i32>,
    pub status: Option<LimitStatus>,
}

impl MeasurementFilters {
    /// Parse the raw query values. Invalid input is reported as a form error.
    pub fn parse(query: &MeasurementsQuery) -> ServiceResult<Self> {
        let measured_from = query
            .from
            .as_deref()
            .map(|raw| parse_datetime(raw, false))
            .transpose()?;
        let measured_to = query
            .to
            .as_deref()
            .map(|raw| parse_datetime(raw, true))
            .transpose()?;

        let parameter_id = query
            .parameter_id
            .as_deref()
            .map(|raw| {
                raw.trim()
                    .parse::<i32>()
                    .map_err(|_| ServiceError::Form(format!("unknown parameter `{raw}`")))
            })
            .transpose()?;

        let status = query
            .status
            .as_deref()
            .map(|raw| {
                raw.parse::<LimitStatus>()
                    .map_err(|err| ServiceError::Form(err.to_string()))
            })
            .transpose()?;

        Ok(Self {
            measured_from,
            measured_to,
            parameter_id,
            status,
        })
    }

    fn to_list_query(&self, supplier_id: &str) -> MeasurementListQuery {
        let mut list_query = MeasurementListQuery::new(supplier_id);

        if let Some(from) = self.measured_from {
            list_query = list_query.measured_from(from);
        }
        if let Some(to) = self.measured_to {
            list_query = list_query.measured_to(to);
        }
        if let Some(parameter_id) = self.parameter_id {
            list_query = list_query.parameter(parameter_id);
        }

        list_query
    }
}

fn parse_datetime(raw: &str, end_of_day: bool) -> ServiceResult<NaiveDateTime> {
    let raw = raw.trim();

    for format in DATETIME_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(value);
        }
    }

    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ServiceError::Form(format!("`{raw}` is not a valid date")))?;

    let time = if end_of_day {
        date.and_hms_nano_opt(23, 59, 59, 999_999_999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };

    time.ok_or_else(|| ServiceError::Form(format!("`{raw}` is not a valid date")))
}

/// Flattened measurement row rendered by the list and the JSON API.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MeasurementView {
    pub id: i32,
    pub supplier_id: String,
    pub supplier_name: String,
    pub parameter_id: i32,
    pub parameter_name: String,
    pub unit: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub value: f64,
    pub measured_at: NaiveDateTime,
    pub status: LimitStatus,
}

impl From<MeasurementRecord> for MeasurementView {
    fn from(record: MeasurementRecord) -> Self {
        let status = record.status();
        let MeasurementRecord {
            measurement,
            parameter,
            supplier,
        } = record;

        Self {
            id: measurement.id,
            supplier_id: measurement.supplier_id,
            supplier_name: supplier.name,
            parameter_id: parameter.id,
            parameter_name: parameter.name,
            unit: parameter.unit,
            min_value: parameter.min_value,
            max_value: parameter.max_value,
            value: measurement.value,
            measured_at: measurement.measured_at,
            status,
        }
    }
}

/// Data required to render the measurements list.
pub struct MeasurementsPageData {
    pub supplier: Supplier,
    pub measurements: Vec<MeasurementView>,
    /// Every parameter, used to populate the filter dropdown.
    pub parameters: Vec<QualityParameter>,
    /// Raw filters echoed back to the template.
    pub query: MeasurementsQuery,
    pub editing: Option<i32>,
    pub confirming_delete: Option<i32>,
}

/// Loads the acting supplier's measurements with all filters applied.
pub fn load_measurements<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: MeasurementsQuery,
) -> ServiceResult<MeasurementsPageData>
where
    R: SupplierReader + SupplierWriter + QualityParameterReader + MeasurementReader + ?Sized,
{
    let filters = MeasurementFilters::parse(&query)?;
    let supplier = ensure_supplier(repo, user)?;

    let (_, parameters) = repo
        .list_quality_parameters(QualityParameterListQuery::new())
        .map_err(ServiceError::from)?;

    let measurements = fetch_measurements(repo, &supplier.id, &filters)?;

    Ok(MeasurementsPageData {
        supplier,
        measurements,
        parameters,
        editing: query.edit,
        confirming_delete: query.confirm_delete,
        query,
    })
}

/// Loads the acting supplier's measurements for the JSON API.
pub fn list_measurements<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &MeasurementsQuery,
) -> ServiceResult<Vec<MeasurementView>>
where
    R: SupplierReader + SupplierWriter + MeasurementReader + ?Sized,
{
    let filters = MeasurementFilters::parse(query)?;
    let supplier = ensure_supplier(repo, user)?;

    fetch_measurements(repo, &supplier.id, &filters)
}

/// Runs the scoped query, then applies the status filter to the fetched rows.
fn fetch_measurements<R>(
    repo: &R,
    supplier_id: &str,
    filters: &MeasurementFilters,
) -> ServiceResult<Vec<MeasurementView>>
where
    R: MeasurementReader + ?Sized,
{
    let records = repo
        .list_measurements(filters.to_list_query(supplier_id))
        .map_err(ServiceError::from)?;

    Ok(records
        .into_iter()
        .filter(|record| record.measurement.supplier_id == supplier_id)
        .map(MeasurementView::from)
        .filter(|view| filters.status.is_none_or(|status| view.status == status))
        .collect())
}

/// Data required to render the "New measurement" form.
pub struct NewMeasurementPageData {
    pub parameters: Vec<QualityParameter>,
}

/// Loads the parameter choices for the measurement form.
pub fn load_new_measurement_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<NewMeasurementPageData>
where
    R: SupplierReader + SupplierWriter + QualityParameterReader + ?Sized,
{
    ensure_supplier(repo, user)?;

    let (_, parameters) = repo
        .list_quality_parameters(QualityParameterListQuery::new())
        .map_err(ServiceError::from)?;

    Ok(NewMeasurementPageData { parameters })
}

/// Records a measurement for the acting supplier at the current time.
///
/// The form is validated before any repository call.
pub fn create_measurement<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddMeasurementForm,
) -> ServiceResult<MeasurementRecord>
where
    R: SupplierReader + SupplierWriter + QualityParameterReader + MeasurementWriter + ?Sized,
{
    let mut new_measurement = form
        .into_new_measurement(&user.sub, Utc::now().naive_utc())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let supplier = ensure_supplier(repo, user)?;
    new_measurement.supplier_id = supplier.id.clone();

    let parameter = repo
        .get_quality_parameter_by_id(new_measurement.parameter_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let measurement = repo
        .create_measurement(&new_measurement)
        .map_err(ServiceError::from)?;

    Ok(MeasurementRecord {
        measurement,
        parameter,
        supplier,
    })
}

/// Saves an inline edit. Only the value changes, and only on an owned row.
pub fn modify_measurement<R>(
    repo: &R,
    user: &AuthenticatedUser,
    measurement_id: i32,
    form: EditMeasurementForm,
) -> ServiceResult<Measurement>
where
    R: SupplierReader + SupplierWriter + MeasurementWriter + ?Sized,
{
    let update = form
        .into_update_measurement(Utc::now().naive_utc())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let supplier = ensure_supplier(repo, user)?;

    repo.update_measurement(measurement_id, &supplier.id, &update)
        .map_err(ServiceError::from)
}

/// Result of the two-step delete interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The row was removed.
    Deleted,
    /// Nothing was touched; the UI must ask for confirmation first.
    ConfirmationRequired,
}

/// Deletes an owned measurement once the request carries confirmation.
pub fn remove_measurement<R>(
    repo: &R,
    user: &AuthenticatedUser,
    measurement_id: i32,
    form: DeleteMeasurementForm,
) -> ServiceResult<DeleteOutcome>
where
    R: SupplierReader + SupplierWriter + MeasurementWriter + ?Sized,
{
    if !form.confirmed {
        return Ok(DeleteOutcome::ConfirmationRequired);
    }

    let supplier = ensure_supplier(repo, user)?;

    repo.delete_measurement(measurement_id, &supplier.id)
        .map_err(ServiceError::from)?;

    Ok(DeleteOutcome::Deleted)
}
