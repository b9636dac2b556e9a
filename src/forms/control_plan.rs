use chrono::NaiveDateTime;
use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::quality_parameter::{Limits, NewQualityParameter, UpdateQualityParameter};
use crate::forms::{parse_decimal, sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for a parameter name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Maximum allowed length for a unit label.
const UNIT_MAX_LEN: u64 = 32;

/// Maximum allowed length for a description.
const DESCRIPTION_MAX_LEN: u64 = 2048;

/// Result type returned by the control plan form helpers.
pub type QualityParameterFormResult<T> = Result<T, QualityParameterFormError>;

/// Errors that can occur while processing control plan forms.
#[derive(Debug, Error)]
pub enum QualityParameterFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("parameter name cannot be empty")]
    EmptyName,
    /// The provided unit is empty after sanitization.
    #[error("unit cannot be empty")]
    EmptyUnit,
    /// A bound was supplied but is not a number.
    #[error("{field} `{value}` is not a valid number")]
    InvalidBound { field: &'static str, value: String },
    /// The lower bound exceeds the upper bound.
    #[error("minimum {min} is greater than maximum {max}")]
    InvertedBounds { min: f64, max: f64 },
}

/// Form payload emitted when submitting the "Add parameter" form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddQualityParameterForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(length(min = 1, max = UNIT_MAX_LEN))]
    pub unit: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub min_value: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub max_value: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    pub description: Option<String>,
}

impl AddQualityParameterForm {
    /// Validates and sanitizes the payload into a domain `NewQualityParameter`.
    pub fn into_new_quality_parameter(self) -> QualityParameterFormResult<NewQualityParameter> {
        self.validate()?;

        let fields = ParameterFields::parse(
            &self.name,
            &self.unit,
            self.min_value.as_deref(),
            self.max_value.as_deref(),
            self.description.as_deref(),
        )?;

        let mut new_parameter =
            NewQualityParameter::new(fields.name, fields.unit).with_limits(fields.limits);

        if let Some(description) = fields.description {
            new_parameter = new_parameter.with_description(description);
        }

        Ok(new_parameter)
    }
}

/// Form payload emitted when editing an existing parameter.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditQualityParameterForm {
    /// Identifier of the parameter to update.
    #[validate(range(min = 1))]
    pub parameter_id: i32,
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(length(min = 1, max = UNIT_MAX_LEN))]
    pub unit: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub min_value: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub max_value: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    pub description: Option<String>,
}

impl EditQualityParameterForm {
    /// Validates and sanitizes the payload into a domain `UpdateQualityParameter`.
    pub fn into_update_quality_parameter(
        self,
        updated_at: NaiveDateTime,
    ) -> QualityParameterFormResult<UpdateQualityParameter> {
        self.validate()?;

        let fields = ParameterFields::parse(
            &self.name,
            &self.unit,
            self.min_value.as_deref(),
            self.max_value.as_deref(),
            self.description.as_deref(),
        )?;

        Ok(UpdateQualityParameter {
            name: fields.name,
            description: fields.description,
            unit: fields.unit,
            min_value: fields.limits.min_value,
            max_value: fields.limits.max_value,
            updated_at,
        })
    }
}

struct ParameterFields {
    name: String,
    unit: String,
    limits: Limits,
    description: Option<String>,
}

impl ParameterFields {
    fn parse(
        name: &str,
        unit: &str,
        min_value: Option<&str>,
        max_value: Option<&str>,
        description: Option<&str>,
    ) -> QualityParameterFormResult<Self> {
        let name = sanitize_inline_text(name);
        if name.is_empty() {
            return Err(QualityParameterFormError::EmptyName);
        }

        let unit = sanitize_inline_text(unit);
        if unit.is_empty() {
            return Err(QualityParameterFormError::EmptyUnit);
        }

        let min_value = parse_bound("minimum", min_value)?;
        let max_value = parse_bound("maximum", max_value)?;

        if let (Some(min), Some(max)) = (min_value, max_value) {
            if min > max {
                return Err(QualityParameterFormError::InvertedBounds { min, max });
            }
        }

        let description = description
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty());

        Ok(Self {
            name,
            unit,
            limits: Limits::new(min_value, max_value),
            description,
        })
    }
}

fn parse_bound(field: &'static str, raw: Option<&str>) -> QualityParameterFormResult<Option<f64>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => parse_decimal(value)
            .map(Some)
            .ok_or_else(|| QualityParameterFormError::InvalidBound {
                field,
                value: value.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn add_form(min: Option<&str>, max: Option<&str>) -> AddQualityParameterForm {
        AddQualityParameterForm {
            name: "  Bore \t diameter ".to_string(),
            unit: " mm ".to_string(),
            min_value: min.map(str::to_string),
            max_value: max.map(str::to_string),
            description: Some("  Measured at\n  three   points ".to_string()),
        }
    }

    #[test]
    fn add_form_sanitizes_and_converts() {
        let parameter = add_form(Some("10"), Some("20,5"))
            .into_new_quality_parameter()
            .expect("expected conversion to succeed");

        assert_eq!(parameter.name, "Bore diameter");
        assert_eq!(parameter.unit, "mm");
        assert_eq!(parameter.min_value, Some(10.0));
        assert_eq!(parameter.max_value, Some(20.5));
        assert_eq!(
            parameter.description.as_deref(),
            Some("Measured at\nthree points")
        );
    }

    #[test]
    fn add_form_allows_open_bounds() {
        let parameter = add_form(None, Some("20"))
            .into_new_quality_parameter()
            .expect("expected conversion to succeed");

        assert_eq!(parameter.min_value, None);
        assert_eq!(parameter.max_value, Some(20.0));
    }

    #[test]
    fn add_form_rejects_non_numeric_bound() {
        let result = add_form(Some("low"), None).into_new_quality_parameter();

        assert!(matches!(
            result,
            Err(QualityParameterFormError::InvalidBound { field: "minimum", .. })
        ));
    }

    #[test]
    fn add_form_rejects_inverted_bounds() {
        let result = add_form(Some("30"), Some("20")).into_new_quality_parameter();

        assert!(matches!(
            result,
            Err(QualityParameterFormError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn add_form_rejects_blank_name() {
        let mut form = add_form(None, None);
        form.name = "   ".to_string();

        let result = form.into_new_quality_parameter();

        assert!(matches!(result, Err(QualityParameterFormError::EmptyName)));
    }

    #[test]
    fn edit_form_clears_bounds() {
        let updated_at = NaiveDate::from_ymd_opt(2024, 2, 1)
            .and_then(|date| date.and_hms_opt(9, 0, 0))
            .expect("valid timestamp");
        let form = EditQualityParameterForm {
            parameter_id: 4,
            name: "Hardness".to_string(),
            unit: "HRC".to_string(),
            min_value: None,
            max_value: None,
            description: None,
        };

        let update = form
            .into_update_quality_parameter(updated_at)
            .expect("expected conversion to succeed");

        assert_eq!(update.name, "Hardness");
        assert_eq!(update.min_value, None);
        assert_eq!(update.max_value, None);
        assert_eq!(update.updated_at, updated_at);
    }
}
