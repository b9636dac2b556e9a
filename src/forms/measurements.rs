use chrono::NaiveDateTime;
use pushkind_common::routes::empty_string_as_none;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::measurement::{NewMeasurement, UpdateMeasurement};
use crate::forms::parse_decimal;

/// Upper bound on the raw text accepted for a measured value.
const VALUE_MAX_LEN: u64 = 64;

/// Result type returned by the measurement form helpers.
pub type MeasurementFormResult<T> = Result<T, MeasurementFormError>;

/// Errors that can occur while processing measurement forms.
#[derive(Debug, Error)]
pub enum MeasurementFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// No quality parameter was selected.
    #[error("select a quality parameter")]
    MissingParameter,
    /// The value is empty or not a number.
    #[error("`{value}` is not a valid number")]
    InvalidValue { value: String },
}

/// Form payload emitted by the "New measurement" page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AddMeasurementForm {
    /// Selected parameter id; empty when nothing was chosen.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub parameter_id: Option<String>,
    /// Raw value typed by the supplier.
    #[serde(default)]
    #[validate(length(max = VALUE_MAX_LEN))]
    pub value: String,
}

impl AddMeasurementForm {
    /// Validates the payload into a domain `NewMeasurement` owned by `supplier_id`.
    pub fn into_new_measurement(
        self,
        supplier_id: &str,
        measured_at: NaiveDateTime,
    ) -> MeasurementFormResult<NewMeasurement> {
        self.validate()?;

        let parameter_id = self
            .parameter_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i32>().ok())
            .filter(|id| *id > 0)
            .ok_or(MeasurementFormError::MissingParameter)?;

        let value = parse_value(&self.value)?;

        Ok(NewMeasurement::new(
            supplier_id,
            parameter_id,
            value,
            measured_at,
        ))
    }
}

/// Form payload emitted when saving an inline edit.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditMeasurementForm {
    /// Edit buffer contents.
    #[serde(default)]
    #[validate(length(max = VALUE_MAX_LEN))]
    pub value: String,
}

impl EditMeasurementForm {
    /// Parses the edit buffer into a value-only `UpdateMeasurement`.
    pub fn into_update_measurement(
        self,
        updated_at: NaiveDateTime,
    ) -> MeasurementFormResult<UpdateMeasurement> {
        self.validate()?;

        let value = parse_value(&self.value)?;

        Ok(UpdateMeasurement { value, updated_at })
    }
}

/// Second step of the delete interaction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteMeasurementForm {
    /// Set by the "confirm" button only.
    #[serde(default)]
    pub confirmed: bool,
}

fn parse_value(raw: &str) -> MeasurementFormResult<f64> {
    parse_decimal(raw).ok_or_else(|| MeasurementFormError::InvalidValue {
        value: raw.trim().to_string(),
    })
}
