use mockall::mock;

use super::{
    MeasurementReader, MeasurementWriter, QualityParameterReader, QualityParameterWriter,
    SupplierReader, SupplierWriter,
};
use crate::domain::{
    measurement::{
        Measurement, MeasurementCounts, MeasurementListQuery, MeasurementRecord, NewMeasurement,
        UpdateMeasurement,
    },
    quality_parameter::{
        NewQualityParameter, QualityParameter, QualityParameterListQuery, UpdateQualityParameter,
    },
    supplier::{NewSupplier, Supplier, SupplierListQuery},
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub QualityParameterReader {}

    impl QualityParameterReader for QualityParameterReader {
        fn get_quality_parameter_by_id(&self, id: i32) -> RepositoryResult<Option<QualityParameter>>;
        fn list_quality_parameters(&self, query: QualityParameterListQuery) -> RepositoryResult<(usize, Vec<QualityParameter>)>;
    }
}

mock! {
    pub QualityParameterWriter {}

    impl QualityParameterWriter for QualityParameterWriter {
        fn create_quality_parameter(&self, new_parameter: &NewQualityParameter) -> RepositoryResult<QualityParameter>;
        fn update_quality_parameter(&self, parameter_id: i32, updates: &UpdateQualityParameter) -> RepositoryResult<QualityParameter>;
    }
}

// Combined repository for services that touch several tables.
mock! {
    pub Repository {}

    impl SupplierReader for Repository {
        fn get_supplier_by_id(&self, id: &str) -> RepositoryResult<Option<Supplier>>;
        fn list_suppliers(&self, query: SupplierListQuery) -> RepositoryResult<(usize, Vec<Supplier>)>;
    }

    impl SupplierWriter for Repository {
        fn create_supplier_if_missing(&self, new_supplier: &NewSupplier) -> RepositoryResult<bool>;
        fn create_suppliers_if_missing(&self, new_suppliers: &[NewSupplier]) -> RepositoryResult<usize>;
    }

    impl QualityParameterReader for Repository {
        fn get_quality_parameter_by_id(&self, id: i32) -> RepositoryResult<Option<QualityParameter>>;
        fn list_quality_parameters(&self, query: QualityParameterListQuery) -> RepositoryResult<(usize, Vec<QualityParameter>)>;
    }

    impl MeasurementReader for Repository {
        fn get_measurement_by_id(&self, id: i32, supplier_id: &str) -> RepositoryResult<Option<Measurement>>;
        fn list_measurements(&self, query: MeasurementListQuery) -> RepositoryResult<Vec<MeasurementRecord>>;
        fn count_measurements(&self, supplier_id: &str) -> RepositoryResult<MeasurementCounts>;
    }

    impl MeasurementWriter for Repository {
        fn create_measurement(&self, new_measurement: &NewMeasurement) -> RepositoryResult<Measurement>;
        fn update_measurement(&self, measurement_id: i32, supplier_id: &str, updates: &UpdateMeasurement) -> RepositoryResult<Measurement>;
        fn delete_measurement(&self, measurement_id: i32, supplier_id: &str) -> RepositoryResult<()>;
    }
}
