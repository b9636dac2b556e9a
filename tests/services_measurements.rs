use pushkind_common::domain::auth::AuthenticatedUser;
use supplier_quality::domain::measurement::MeasurementListQuery;
use supplier_quality::domain::quality_parameter::LimitStatus;
use supplier_quality::forms::control_plan::AddQualityParameterForm;
use supplier_quality::forms::measurements::{
    AddMeasurementForm, DeleteMeasurementForm, EditMeasurementForm,
};
use supplier_quality::repository::{DieselRepository, MeasurementReader, SupplierReader};
use supplier_quality::services::control_plan::create_quality_parameter;
use supplier_quality::services::measurements::{
    DeleteOutcome, MeasurementsQuery, create_measurement, list_measurements, load_measurements,
    modify_measurement, remove_measurement,
};
use supplier_quality::services::suppliers::ensure_supplier;
use supplier_quality::{SERVICE_ACCESS_ROLE, services::ServiceError};

mod common;

fn identity(sub: &str, email: &str, roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: sub.into(),
        email: email.into(),
        hub_id: 1,
        name: String::new(),
        roles: roles.iter().map(|role| (*role).to_string()).collect(),
        exp: 0,
    }
}

fn add_parameter(repo: &DieselRepository, name: &str, min: &str, max: &str) -> i32 {
    let admin = identity("admin", "admin@plant.test", &[SERVICE_ACCESS_ROLE]);
    let form = AddQualityParameterForm {
        name: name.to_string(),
        unit: "mm".to_string(),
        min_value: Some(min.to_string()).filter(|value| !value.is_empty()),
        max_value: Some(max.to_string()).filter(|value| !value.is_empty()),
        description: None,
    };

    create_quality_parameter(repo, &admin, form)
        .expect("create parameter")
        .id
}

fn record(repo: &DieselRepository, user: &AuthenticatedUser, parameter_id: i32, value: &str) -> i32 {
    let form = AddMeasurementForm {
        parameter_id: Some(parameter_id.to_string()),
        value: value.to_string(),
    };

    create_measurement(repo, user, form)
        .expect("record measurement")
        .measurement
        .id
}

#[test]
fn signup_provisions_exactly_one_supplier() {
    let test_db = common::TestDb::new("service_signup_provisions_one_supplier.db");
    let repo = DieselRepository::new(test_db.pool());
    let user = identity("identity-1", "QA@Vendor.test", &[]);

    let first = ensure_supplier(&repo, &user).expect("first provisioning");
    let second = ensure_supplier(&repo, &user).expect("second provisioning");

    assert_eq!(first, second);
    assert_eq!(first.id, "identity-1");
    assert_eq!(first.email, "qa@vendor.test");
    assert_eq!(first.name, "qa@vendor.test");

    let (total, _) = repo
        .list_suppliers(Default::default())
        .expect("list suppliers");
    assert_eq!(total, 1);

    let impostor = identity("identity-2", "qa@vendor.test", &[]);
    assert!(matches!(
        ensure_supplier(&repo, &impostor),
        Err(ServiceError::Conflict)
    ));
}

#[test]
fn measurement_list_classifies_and_filters_by_status() {
    let test_db = common::TestDb::new("service_measurement_list_status.db");
    let repo = DieselRepository::new(test_db.pool());
    let user = identity("identity-1", "qa@vendor.test", &[]);

    let bounded = add_parameter(&repo, "Bore diameter", "10", "20");
    let open_min = add_parameter(&repo, "Runout", "", "20");

    for value in ["10", "20", "9.99", "20.01"] {
        record(&repo, &user, bounded, value);
    }
    record(&repo, &user, open_min, "-1000000");

    let within = load_measurements(
        &repo,
        &user,
        MeasurementsQuery {
            status: Some("within".to_string()),
            ..MeasurementsQuery::default()
        },
    )
    .expect("load within");
    let mut values: Vec<f64> = within.measurements.iter().map(|row| row.value).collect();
    values.sort_by(f64::total_cmp);
    assert_eq!(values, vec![-1_000_000.0, 10.0, 20.0]);
    assert_eq!(within.parameters.len(), 2);

    let outside = load_measurements(
        &repo,
        &user,
        MeasurementsQuery {
            parameter_id: Some(bounded.to_string()),
            status: Some("outside".to_string()),
            ..MeasurementsQuery::default()
        },
    )
    .expect("load outside");
    let mut values: Vec<f64> = outside.measurements.iter().map(|row| row.value).collect();
    values.sort_by(f64::total_cmp);
    assert_eq!(values, vec![9.99, 20.01]);
    assert!(
        outside
            .measurements
            .iter()
            .all(|row| row.status == LimitStatus::Outside)
    );
}

#[test]
fn suppliers_only_see_and_mutate_their_own_rows() {
    let test_db = common::TestDb::new("service_suppliers_own_rows.db");
    let repo = DieselRepository::new(test_db.pool());
    let alice = identity("alice", "alice@a.test", &[]);
    let bob = identity("bob", "bob@b.test", &[]);

    let parameter = add_parameter(&repo, "Hardness", "40", "45");
    let alices = record(&repo, &alice, parameter, "42");
    record(&repo, &bob, parameter, "44");

    let rows = list_measurements(&repo, &alice, &MeasurementsQuery::default()).expect("list");
    assert_eq!(rows.len(), 1);
    assert!(rows.iter().all(|row| row.supplier_id == "alice"));

    let result = modify_measurement(
        &repo,
        &bob,
        alices,
        EditMeasurementForm {
            value: "1".to_string(),
        },
    );
    assert!(matches!(result, Err(ServiceError::NotFound)));

    let result = remove_measurement(
        &repo,
        &bob,
        alices,
        DeleteMeasurementForm { confirmed: true },
    );
    assert!(matches!(result, Err(ServiceError::NotFound)));

    let stored = repo
        .get_measurement_by_id(alices, "alice")
        .expect("get measurement")
        .expect("measurement survives");
    assert_eq!(stored.value, 42.0);
}

#[test]
fn invalid_edit_leaves_value_unchanged() {
    let test_db = common::TestDb::new("service_invalid_edit_unchanged.db");
    let repo = DieselRepository::new(test_db.pool());
    let user = identity("identity-1", "qa@vendor.test", &[]);

    let parameter = add_parameter(&repo, "Flatness", "", "");
    let id = record(&repo, &user, parameter, "3.5");

    let result = modify_measurement(
        &repo,
        &user,
        id,
        EditMeasurementForm {
            value: "three".to_string(),
        },
    );
    assert!(matches!(result, Err(ServiceError::Form(_))));

    let stored = repo
        .get_measurement_by_id(id, "identity-1")
        .expect("get measurement")
        .expect("measurement exists");
    assert_eq!(stored.value, 3.5);

    let updated = modify_measurement(
        &repo,
        &user,
        id,
        EditMeasurementForm {
            value: "4,25".to_string(),
        },
    )
    .expect("valid edit");
    assert_eq!(updated.value, 4.25);
}

#[test]
fn delete_needs_confirmation_then_removes_row() {
    let test_db = common::TestDb::new("service_delete_confirmation.db");
    let repo = DieselRepository::new(test_db.pool());
    let user = identity("identity-1", "qa@vendor.test", &[]);

    let parameter = add_parameter(&repo, "Weight", "1", "2");
    let id = record(&repo, &user, parameter, "1.5");

    let outcome = remove_measurement(&repo, &user, id, DeleteMeasurementForm::default())
        .expect("first step");
    assert_eq!(outcome, DeleteOutcome::ConfirmationRequired);
    assert_eq!(
        repo.list_measurements(MeasurementListQuery::new("identity-1"))
            .expect("list")
            .len(),
        1
    );

    let outcome = remove_measurement(&repo, &user, id, DeleteMeasurementForm { confirmed: true })
        .expect("second step");
    assert_eq!(outcome, DeleteOutcome::Deleted);

    let page = load_measurements(&repo, &user, MeasurementsQuery::default()).expect("load");
    assert!(page.measurements.is_empty());
}

#[test]
fn measurement_for_unknown_parameter_is_rejected() {
    let test_db = common::TestDb::new("service_unknown_parameter.db");
    let repo = DieselRepository::new(test_db.pool());
    let user = identity("identity-1", "qa@vendor.test", &[]);

    let result = create_measurement(
        &repo,
        &user,
        AddMeasurementForm {
            parameter_id: Some("404".to_string()),
            value: "1".to_string(),
        },
    );

    assert!(matches!(result, Err(ServiceError::NotFound)));
}
