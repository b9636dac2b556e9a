use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::measurement::{
    Measurement, MeasurementCounts, MeasurementListQuery, MeasurementRecord, NewMeasurement,
    UpdateMeasurement,
};
use crate::domain::quality_parameter::{
    NewQualityParameter, QualityParameter, QualityParameterListQuery, UpdateQualityParameter,
};
use crate::domain::supplier::{NewSupplier, Supplier, SupplierListQuery};

pub mod measurement;
pub mod quality_parameter;
pub mod supplier;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
///
/// Every measurement operation is scoped by the acting supplier id, which
/// is how row ownership is enforced.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over supplier records.
pub trait SupplierReader {
    fn get_supplier_by_id(&self, id: &str) -> RepositoryResult<Option<Supplier>>;
    fn list_suppliers(&self, query: SupplierListQuery) -> RepositoryResult<(usize, Vec<Supplier>)>;
}

/// Provisioning of supplier records. Suppliers are never updated or deleted.
pub trait SupplierWriter {
    /// Insert the supplier unless its id or email is already taken.
    /// Returns `true` when a row was created.
    fn create_supplier_if_missing(&self, new_supplier: &NewSupplier) -> RepositoryResult<bool>;
    /// Insert every missing supplier, skipping conflicts. Returns the number created.
    fn create_suppliers_if_missing(&self, new_suppliers: &[NewSupplier]) -> RepositoryResult<usize>;
}

/// Read-only operations over the control plan.
pub trait QualityParameterReader {
    fn get_quality_parameter_by_id(&self, id: i32) -> RepositoryResult<Option<QualityParameter>>;
    fn list_quality_parameters(
        &self,
        query: QualityParameterListQuery,
    ) -> RepositoryResult<(usize, Vec<QualityParameter>)>;
}

/// Write operations over the control plan.
pub trait QualityParameterWriter {
    fn create_quality_parameter(
        &self,
        new_parameter: &NewQualityParameter,
    ) -> RepositoryResult<QualityParameter>;
    fn update_quality_parameter(
        &self,
        parameter_id: i32,
        updates: &UpdateQualityParameter,
    ) -> RepositoryResult<QualityParameter>;
}

/// Supplier-scoped reads of measurements.
pub trait MeasurementReader {
    fn get_measurement_by_id(
        &self,
        id: i32,
        supplier_id: &str,
    ) -> RepositoryResult<Option<Measurement>>;
    /// Newest first.
    fn list_measurements(
        &self,
        query: MeasurementListQuery,
    ) -> RepositoryResult<Vec<MeasurementRecord>>;
    fn count_measurements(&self, supplier_id: &str) -> RepositoryResult<MeasurementCounts>;
}

/// Supplier-scoped writes of measurements.
pub trait MeasurementWriter {
    fn create_measurement(&self, new_measurement: &NewMeasurement)
    -> RepositoryResult<Measurement>;
    fn update_measurement(
        &self,
        measurement_id: i32,
        supplier_id: &str,
        updates: &UpdateMeasurement,
    ) -> RepositoryResult<Measurement>;
    fn delete_measurement(&self, measurement_id: i32, supplier_id: &str) -> RepositoryResult<()>;
}
