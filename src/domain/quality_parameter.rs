use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// A measurable attribute with an optional acceptable range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualityParameter {
    /// Unique identifier of the parameter.
    pub id: i32,
    /// Human-readable name of the parameter.
    pub name: String,
    /// Optional longer description shown to suppliers.
    pub description: Option<String>,
    /// Unit the values are recorded in.
    pub unit: String,
    /// Inclusive lower bound, if any.
    pub min_value: Option<f64>,
    /// Inclusive upper bound, if any.
    pub max_value: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl QualityParameter {
    /// Bounds configured for this parameter.
    pub fn limits(&self) -> Limits {
        Limits {
            min_value: self.min_value,
            max_value: self.max_value,
        }
    }
}

/// Inclusive acceptance range. A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Limits {
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl Limits {
    pub fn new(min_value: Option<f64>, max_value: Option<f64>) -> Self {
        Self {
            min_value,
            max_value,
        }
    }

    /// Whether `value` satisfies both configured bounds.
    pub fn contains(&self, value: f64) -> bool {
        self.min_value.is_none_or(|min| value >= min)
            && self.max_value.is_none_or(|max| value <= max)
    }

    /// Classify `value` against the bounds.
    pub fn status(&self, value: f64) -> LimitStatus {
        if self.contains(value) {
            LimitStatus::Within
        } else {
            LimitStatus::Outside
        }
    }
}

/// Classification of a measured value against its parameter limits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LimitStatus {
    Within,
    Outside,
}

impl LimitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitStatus::Within => "within",
            LimitStatus::Outside => "outside",
        }
    }
}

impl fmt::Display for LimitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLimitStatus(pub String);

impl fmt::Display for UnknownLimitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status `{}`", self.0)
    }
}

impl std::error::Error for UnknownLimitStatus {}

impl FromStr for LimitStatus {
    type Err = UnknownLimitStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "within" => Ok(LimitStatus::Within),
            "outside" => Ok(LimitStatus::Outside),
            other => Err(UnknownLimitStatus(other.to_string())),
        }
    }
}

/// Payload required to insert a new quality parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQualityParameter {
    pub name: String,
    pub description: Option<String>,
    pub unit: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl NewQualityParameter {
    /// Build a parameter payload without description or bounds.
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            unit: unit.into(),
            min_value: None,
            max_value: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach inclusive bounds to the payload.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.min_value = limits.min_value;
        self.max_value = limits.max_value;
        self
    }
}

/// Full replacement of the editable fields of a quality parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQualityParameter {
    pub name: String,
    pub description: Option<String>,
    pub unit: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list quality parameters.
#[derive(Debug, Clone, Default)]
pub struct QualityParameterListQuery {
    /// Optional substring matched against the parameter name.
    pub search: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl QualityParameterListQuery {
    /// Construct a query returning every parameter.
    pub fn new() -> Self {
        Self::default()
    }

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
