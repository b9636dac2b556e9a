use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::measurement::{
    Measurement as DomainMeasurement, NewMeasurement as DomainNewMeasurement,
    UpdateMeasurement as DomainUpdateMeasurement,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::measurements)]
pub struct Measurement {
    pub id: i32,
    pub supplier_id: String,
    pub parameter_id: i32,
    pub value: f64,
    pub measured_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::measurements)]
pub struct NewMeasurement<'a> {
    pub supplier_id: &'a str,
    pub parameter_id: i32,
    pub value: f64,
    pub measured_at: NaiveDateTime,
}

/// Only the value is editable; owner and parameter stay fixed.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::measurements)]
pub struct UpdateMeasurement {
    pub value: f64,
    pub updated_at: NaiveDateTime,
}

impl From<Measurement> for DomainMeasurement {
    fn from(value: Measurement) -> Self {
        Self {
            id: value.id,
            supplier_id: value.supplier_id,
            parameter_id: value.parameter_id,
            value: value.value,
            measured_at: value.measured_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewMeasurement> for NewMeasurement<'a> {
    fn from(value: &'a DomainNewMeasurement) -> Self {
        Self {
            supplier_id: value.supplier_id.as_str(),
            parameter_id: value.parameter_id,
            value: value.value,
            measured_at: value.measured_at,
        }
    }
}

impl From<&DomainUpdateMeasurement> for UpdateMeasurement {
    fn from(value: &DomainUpdateMeasurement) -> Self {
        Self {
            value: value.value,
            updated_at: value.updated_at,
        }
    }
}
