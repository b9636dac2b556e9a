use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::measurement::{
    Measurement as DomainMeasurement, MeasurementCounts, MeasurementListQuery, MeasurementRecord,
    NewMeasurement as DomainNewMeasurement, UpdateMeasurement as DomainUpdateMeasurement,
};
use crate::models::measurement::{
    Measurement as DbMeasurement, NewMeasurement as DbNewMeasurement,
    UpdateMeasurement as DbUpdateMeasurement,
};
use crate::models::quality_parameter::QualityParameter as DbQualityParameter;
use crate::models::supplier::Supplier as DbSupplier;
use crate::repository::{DieselRepository, MeasurementReader, MeasurementWriter};

impl MeasurementReader for DieselRepository {
    fn get_measurement_by_id(
        &self,
        id: i32,
        supplier_id: &str,
    ) -> RepositoryResult<Option<DomainMeasurement>> {
        use crate::schema::measurements;

        let mut conn = self.conn()?;
        let measurement = measurements::table
            .filter(measurements::id.eq(id))
            .filter(measurements::supplier_id.eq(supplier_id))
            .first::<DbMeasurement>(&mut conn)
            .optional()?;

        Ok(measurement.map(Into::into))
    }

    fn list_measurements(
        &self,
        query: MeasurementListQuery,
    ) -> RepositoryResult<Vec<MeasurementRecord>> {
        use crate::schema::{measurements, quality_parameters, suppliers};

        let mut conn = self.conn()?;

        let mut items = measurements::table
            .inner_join(quality_parameters::table)
            .inner_join(suppliers::table)
            .filter(measurements::supplier_id.eq(&query.supplier_id))
            .select((
                DbMeasurement::as_select(),
                DbQualityParameter::as_select(),
                DbSupplier::as_select(),
            ))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(from) = query.measured_from {
            items = items.filter(measurements::measured_at.ge(from));
        }

        if let Some(to) = query.measured_to {
            items = items.filter(measurements::measured_at.le(to));
        }

        if let Some(parameter_id) = query.parameter_id {
            items = items.filter(measurements::parameter_id.eq(parameter_id));
        }

        items = items.order((measurements::measured_at.desc(), measurements::id.desc()));

        if let Some(limit) = query.limit {
            items = items.limit(limit as i64);
        }

        let rows = items.load::<(DbMeasurement, DbQualityParameter, DbSupplier)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(measurement, parameter, supplier)| MeasurementRecord {
                measurement: measurement.into(),
                parameter: parameter.into(),
                supplier: supplier.into(),
            })
            .collect())
    }

    fn count_measurements(&self, supplier_id: &str) -> RepositoryResult<MeasurementCounts> {
        use crate::schema::{measurements, quality_parameters};

        let mut conn = self.conn()?;

        let total = measurements::table
            .filter(measurements::supplier_id.eq(supplier_id))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        // Comparisons against a NULL bound are NULL, so absent limits never count.
        let outside_limits = measurements::table
            .inner_join(quality_parameters::table)
            .filter(measurements::supplier_id.eq(supplier_id))
            .filter(
                measurements::value
                    .nullable()
                    .lt(quality_parameters::min_value)
                    .or(measurements::value
                        .nullable()
                        .gt(quality_parameters::max_value)),
            )
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        Ok(MeasurementCounts {
            total,
            outside_limits,
        })
    }
}

impl MeasurementWriter for DieselRepository {
    fn create_measurement(
        &self,
        new_measurement: &DomainNewMeasurement,
    ) -> RepositoryResult<DomainMeasurement> {
        use crate::schema::measurements;

        let mut conn = self.conn()?;
        let insertable = DbNewMeasurement::from(new_measurement);

        let created = diesel::insert_into(measurements::table)
            .values(&insertable)
            .get_result::<DbMeasurement>(&mut conn)?;

        Ok(created.into())
    }

    fn update_measurement(
        &self,
        measurement_id: i32,
        supplier_id: &str,
        updates: &DomainUpdateMeasurement,
    ) -> RepositoryResult<DomainMeasurement> {
        use crate::schema::measurements;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateMeasurement::from(updates);

        let target = measurements::table
            .filter(measurements::id.eq(measurement_id))
            .filter(measurements::supplier_id.eq(supplier_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbMeasurement>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_measurement(&self, measurement_id: i32, supplier_id: &str) -> RepositoryResult<()> {
        use crate::schema::measurements;

        let mut conn = self.conn()?;
        let target = measurements::table
            .filter(measurements::id.eq(measurement_id))
            .filter(measurements::supplier_id.eq(supplier_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
