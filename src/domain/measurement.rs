use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::quality_parameter::{LimitStatus, QualityParameter};
use crate::domain::supplier::Supplier;

/// A single recorded observation of a quality parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    pub id: i32,
    /// Owning supplier; always the identity that recorded the value.
    pub supplier_id: String,
    pub parameter_id: i32,
    pub value: f64,
    /// Moment the value was taken.
    pub measured_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Measurement joined with its parameter and supplier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasurementRecord {
    pub measurement: Measurement,
    pub parameter: QualityParameter,
    pub supplier: Supplier,
}

impl MeasurementRecord {
    /// Classify the measured value against the parameter limits.
    pub fn status(&self) -> LimitStatus {
        self.parameter.limits().status(self.measurement.value)
    }
}

/// Payload required to record a new measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeasurement {
    pub supplier_id: String,
    pub parameter_id: i32,
    pub value: f64,
    pub measured_at: NaiveDateTime,
}

impl NewMeasurement {
    pub fn new(
        supplier_id: impl Into<String>,
        parameter_id: i32,
        value: f64,
        measured_at: NaiveDateTime,
    ) -> Self {
        Self {
            supplier_id: supplier_id.into(),
            parameter_id,
            value,
            measured_at,
        }
    }
}

/// Value-only patch applied to an existing measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateMeasurement {
    pub value: f64,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

/// Aggregate counts over one supplier's measurements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeasurementCounts {
    pub total: usize,
    /// Rows whose value falls outside the parameter limits.
    pub outside_limits: usize,
}

/// Query definition used to list one supplier's measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementListQuery {
    /// Owning supplier; rows of other suppliers are never returned.
    pub supplier_id: String,
    /// Inclusive lower bound on `measured_at`.
    pub measured_from: Option<NaiveDateTime>,
    /// Inclusive upper bound on `measured_at`.
    pub measured_to: Option<NaiveDateTime>,
    /// Exact parameter filter.
    pub parameter_id: Option<i32>,
    /// Maximum number of rows returned, newest first.
    pub limit: Option<usize>,
}

impl MeasurementListQuery {
    /// Construct a query that targets all measurements of `supplier_id`.
    pub fn new(supplier_id: impl Into<String>) -> Self {
        Self {
            supplier_id: supplier_id.into(),
            measured_from: None,
            measured_to: None,
            parameter_id: None,
            limit: None,
        }
    }

    pub fn measured_from(mut self, from: NaiveDateTime) -> Self {
        self.measured_from = Some(from);
        self
    }

    pub fn measured_to(mut self, to: NaiveDateTime) -> Self {
        self.measured_to = Some(to);
        self
    }

    /// Restrict the results to a single quality parameter.
    pub fn parameter(mut self, parameter_id: i32) -> Self {
        self.parameter_id = Some(parameter_id);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
