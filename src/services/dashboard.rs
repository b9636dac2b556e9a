use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::measurement::MeasurementListQuery;
use crate::domain::quality_parameter::QualityParameterListQuery;
use crate::domain::supplier::Supplier;
use crate::repository::{MeasurementReader, QualityParameterReader, SupplierReader, SupplierWriter};
use crate::services::measurements::MeasurementView;
use crate::services::suppliers::ensure_supplier;
use crate::services::{ServiceError, ServiceResult};

/// Number of latest measurements shown on the dashboard.
const RECENT_MEASUREMENTS: usize = 5;

/// Data required to render the dashboard template.
pub struct DashboardData {
    pub supplier: Supplier,
    pub measurement_count: usize,
    pub outside_limits_count: usize,
    pub parameter_count: usize,
    pub recent: Vec<MeasurementView>,
}

/// Summarises the acting supplier's measurements.
pub fn load_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardData>
where
    R: SupplierReader + SupplierWriter + QualityParameterReader + MeasurementReader + ?Sized,
{
    let supplier = ensure_supplier(repo, user)?;

    let (parameter_count, _) = repo
        .list_quality_parameters(QualityParameterListQuery::new().paginate(1, 1))
        .map_err(ServiceError::from)?;

    let counts = repo
        .count_measurements(&supplier.id)
        .map_err(ServiceError::from)?;

    let recent_query = MeasurementListQuery::new(supplier.id.as_str()).limit(RECENT_MEASUREMENTS);
    let recent = repo
        .list_measurements(recent_query)
        .map_err(ServiceError::from)?
        .into_iter()
        .map(MeasurementView::from)
        .collect();

    Ok(DashboardData {
        supplier,
        measurement_count: counts.total,
        outside_limits_count: counts.outside_limits,
        parameter_count,
        recent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    use crate::domain::quality_parameter::LimitStatus;

    use crate::domain::measurement::{Measurement, MeasurementCounts, MeasurementRecord};
    use crate::domain::quality_parameter::QualityParameter;
    use crate::repository::mock::MockRepository;

    fn supplier() -> Supplier {
        Supplier {
            id: "identity-1".to_string(),
            name: "Vendor".to_string(),
            email: "qa@vendor.test".to_string(),
            created_at: NaiveDateTime::default(),
        }
    }

    fn record(id: i32, value: f64) -> MeasurementRecord {
        MeasurementRecord {
            measurement: Measurement {
                id,
                supplier_id: "identity-1".to_string(),
                parameter_id: 1,
                value,
                measured_at: NaiveDateTime::default(),
                created_at: NaiveDateTime::default(),
                updated_at: NaiveDateTime::default(),
            },
            parameter: QualityParameter {
                id: 1,
                name: "Hardness".to_string(),
                description: None,
                unit: "HRC".to_string(),
                min_value: Some(40.0),
                max_value: Some(45.0),
                created_at: NaiveDateTime::default(),
                updated_at: NaiveDateTime::default(),
            },
            supplier: supplier(),
        }
    }

    #[test]
    fn load_dashboard_counts_measurements() {
        let mut repo = MockRepository::new();
        let user = AuthenticatedUser {
            sub: "identity-1".to_string(),
            email: "qa@vendor.test".to_string(),
            hub_id: 1,
            name: "Vendor".to_string(),
            roles: vec![],
            exp: 0,
        };

        repo.expect_create_supplier_if_missing()
            .returning(|_| Ok(false));
        repo.expect_get_supplier_by_id()
            .returning(|_| Ok(Some(supplier())));
        repo.expect_list_quality_parameters()
            .returning(|_| Ok((3, Vec::new())));
        repo.expect_count_measurements()
            .times(1)
            .withf(|supplier_id| supplier_id == "identity-1")
            .returning(|_| {
                Ok(MeasurementCounts {
                    total: 7,
                    outside_limits: 3,
                })
            });
        repo.expect_list_measurements()
            .times(1)
            .withf(|query| {
                query.supplier_id == "identity-1" && query.limit == Some(RECENT_MEASUREMENTS)
            })
            .returning(|_| {
                Ok((1..=5)
                    .map(|id| record(id, if id % 2 == 0 { 50.0 } else { 42.0 }))
                    .collect())
            });

        let data = load_dashboard(&repo, &user).expect("expected success");

        assert_eq!(data.supplier.id, "identity-1");
        assert_eq!(data.parameter_count, 3);
        assert_eq!(data.measurement_count, 7);
        assert_eq!(data.outside_limits_count, 3);
        assert_eq!(data.recent.len(), 5);
        assert_eq!(data.recent[1].status, LimitStatus::Outside);
    }
}
