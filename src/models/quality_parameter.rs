use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::quality_parameter::{
    NewQualityParameter as DomainNewQualityParameter, QualityParameter as DomainQualityParameter,
    UpdateQualityParameter as DomainUpdateQualityParameter,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::quality_parameters)]
pub struct QualityParameter {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub unit: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::quality_parameters)]
pub struct NewQualityParameter<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub unit: &'a str,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::quality_parameters)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateQualityParameter<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub unit: &'a str,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub updated_at: NaiveDateTime,
}

impl From<QualityParameter> for DomainQualityParameter {
    fn from(value: QualityParameter) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            unit: value.unit,
            min_value: value.min_value,
            max_value: value.max_value,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewQualityParameter> for NewQualityParameter<'a> {
    fn from(value: &'a DomainNewQualityParameter) -> Self {
        Self {
            name: value.name.as_str(),
            description: value.description.as_deref(),
            unit: value.unit.as_str(),
            min_value: value.min_value,
            max_value: value.max_value,
        }
    }
}

impl<'a> From<&'a DomainUpdateQualityParameter> for UpdateQualityParameter<'a> {
    fn from(value: &'a DomainUpdateQualityParameter) -> Self {
        Self {
            name: value.name.as_str(),
            description: value.description.as_deref(),
            unit: value.unit.as_str(),
            min_value: value.min_value,
            max_value: value.max_value,
            updated_at: value.updated_at,
        }
    }
}
