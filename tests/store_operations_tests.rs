//! Tests for entity CRUD, not-found policies and record queries

use chrono::{DateTime, Duration, TimeZone, Utc};
use yard_access_monitor::error::{EntityKind, StoreError, ValidationError};
use yard_access_monitor::store::{EntityStore, NewAccessRecord, NewDriver, NewVehicle, RecordFilter};
use yard_access_monitor::types::{
    DriverId, Location, NotFoundPolicy, PatioColor, RecordId, RecordStatus, VehicleId, VehicleType,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap()
}

/// Record starting on the terminal route, every earlier stage stamped at `at`
fn on_terminal_route(plate: &str, at: DateTime<Utc>) -> NewAccessRecord {
    NewAccessRecord::new(plate, VehicleType::Normal)
        .at_location(Location::EnRouteToTerminal)
        .with_patio_entry(at)
        .with_patio_exit(at)
        .with_pc1_entry(at)
        .with_pc1_exit(at)
}

#[test]
fn test_driver_crud_round() {
    let mut store = EntityStore::new();
    let driver = store.add_driver(NewDriver::new("Maria Souza", "98765432100").with_plate("abc1d23")).unwrap();
    assert_eq!(driver.id, DriverId(1));
    assert_eq!(driver.document, "987.654.321-00");
    assert_eq!(driver.plate.as_deref(), Some("ABC1D23"));

    let mut edited = driver.clone();
    edited.name = "Maria S. Souza".to_string();
    assert!(store.update_driver(edited).unwrap());
    assert_eq!(store.driver(driver.id).unwrap().name, "Maria S. Souza");

    assert_eq!(store.find_driver_by_document("987.654.321-00").unwrap().id, driver.id);
    assert_eq!(store.find_driver_by_document("98765432100").unwrap().id, driver.id);
    assert!(store.find_driver_by_document("").is_none());

    assert!(store.delete_driver(driver.id).unwrap());
    assert!(store.drivers().is_empty());
}

#[test]
fn test_cnpj_document_is_masked() {
    let mut store = EntityStore::new();
    let driver = store.add_driver(NewDriver::new("Transportes Almeida", "12345678000199")).unwrap();
    assert_eq!(driver.document, "12.345.678/0001-99");
}

#[test]
fn test_driver_validation_failures_do_not_consume_ids() {
    let mut store = EntityStore::new();
    let err = store.add_driver(NewDriver::new("   ", "12345678901")).unwrap_err();
    assert_eq!(err, StoreError::Validation(ValidationError::BlankField { field: "name" }));

    let err = store.add_driver(NewDriver::new("Ana", "1234")).unwrap_err();
    assert_eq!(err, StoreError::Validation(ValidationError::InvalidDocument { digits: 4 }));

    let driver = store.add_driver(NewDriver::new("Ana", "12345678901")).unwrap();
    assert_eq!(driver.id, DriverId(1));
}

#[test]
fn test_vehicle_crud_round() {
    let mut store = EntityStore::new();
    let vehicle = store.add_vehicle(NewVehicle::new(" xyz-9876 ", "Scania R450", "Branco")).unwrap();
    assert_eq!(vehicle.id, VehicleId(1));
    assert_eq!(vehicle.plate, "XYZ-9876");

    let mut edited = vehicle.clone();
    edited.color = "Azul".to_string();
    assert!(store.update_vehicle(edited).unwrap());
    assert_eq!(store.vehicle(vehicle.id).unwrap().color, "Azul");

    assert!(store.delete_vehicle(vehicle.id).unwrap());
    assert!(store.vehicle(vehicle.id).is_none());

    // Ids are never reused after a delete
    let next = store.add_vehicle(NewVehicle::new("ABC1D23", "Volvo FH", "Prata")).unwrap();
    assert_eq!(next.id, VehicleId(2));
}

#[test]
fn test_not_found_policy_report() {
    let mut store = EntityStore::new();
    let err = store.delete_driver(DriverId(42)).unwrap_err();
    assert_eq!(err, StoreError::not_found(EntityKind::Driver, DriverId(42)));
    assert!(err.is_recoverable());
    assert_eq!(err.category(), "Not Found");

    let err = store.delete_vehicle(VehicleId(3)).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: EntityKind::Vehicle, .. }));

    let err = store.set_patio_color(RecordId(9), PatioColor::Green).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: EntityKind::AccessRecord, .. }));
}

#[test]
fn test_not_found_policy_ignore() {
    let mut store = EntityStore::with_policy(NotFoundPolicy::Ignore);
    let rev = store.revision();

    assert!(!store.delete_driver(DriverId(42)).unwrap());
    assert!(!store.delete_vehicle(VehicleId(3)).unwrap());
    assert!(!store.set_pegasus_link(RecordId(9), true).unwrap());
    assert_eq!(store.revision(), rev);
}

#[test]
fn test_query_filters_and_orders_newest_first() {
    let mut store = EntityStore::new();
    let first = store
        .add_access_record_at(NewAccessRecord::new("ABC-1234", VehicleType::Normal), t0())
        .unwrap();
    let second = store
        .add_access_record_at(
            NewAccessRecord::new("ABD1E23", VehicleType::Service),
            t0() + Duration::minutes(5),
        )
        .unwrap();
    let third = store
        .add_access_record_at(
            on_terminal_route("QWE-5555", t0() + Duration::minutes(10)),
            t0() + Duration::minutes(10),
        )
        .unwrap();
    store.register_exit_at(third.id, t0() + Duration::minutes(12)).unwrap();

    let all = store.query_access_records(&RecordFilter::new());
    let ids: Vec<RecordId> = all.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);

    let by_plate = store.query_access_records(&RecordFilter::new().with_plate("ab"));
    let ids: Vec<RecordId> = by_plate.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let exited = store.query_access_records(&RecordFilter::new().with_status(RecordStatus::Exited));
    assert_eq!(exited.len(), 1);
    assert_eq!(exited[0].id, third.id);

    let inside = store.query_access_records(
        &RecordFilter::new().with_plate("  ").with_status(RecordStatus::InComplex),
    );
    assert_eq!(inside.len(), 2);
}

#[test]
fn test_find_open_record_by_plate() {
    let mut store = EntityStore::new();
    let earlier = store
        .add_access_record_at(
            on_terminal_route("ABC-1234", t0()),
            t0(),
        )
        .unwrap();
    store.register_exit_at(earlier.id, t0() + Duration::minutes(30)).unwrap();
    assert!(store.find_open_record_by_plate("abc-1234").is_none());

    let again = store
        .add_access_record_at(NewAccessRecord::new("ABC-1234", VehicleType::Normal), t0() + Duration::hours(2))
        .unwrap();
    assert_eq!(store.find_open_record_by_plate(" abc-1234 ").unwrap().id, again.id);
}

#[test]
fn test_analytic_setters() {
    let mut store = EntityStore::new();
    let id = store
        .add_access_record_at(NewAccessRecord::new("ABC-1234", VehicleType::Normal), t0())
        .unwrap()
        .id;

    assert!(store.set_pegasus_link(id, true).unwrap());
    assert!(store.set_patio_color(id, PatioColor::Yellow).unwrap());
    assert!(store.set_speed_average(id, 42.5).unwrap());

    let record = store.access_record(id).unwrap();
    assert_eq!(record.pegasus_linked_data, Some(true));
    assert_eq!(record.patio_color, Some(PatioColor::Yellow));
    assert_eq!(record.speed_average, Some(42.5));

    let err = store.set_speed_average(id, -1.0).unwrap_err();
    assert_eq!(err, StoreError::Validation(ValidationError::InvalidSpeed(-1.0)));
    assert_eq!(store.access_record(id).unwrap().speed_average, Some(42.5));
}

#[test]
fn test_closed_records_are_read_only() {
    let mut store = EntityStore::new();
    let id = store
        .add_access_record_at(
            on_terminal_route("ABC-1234", t0()),
            t0(),
        )
        .unwrap()
        .id;
    store.register_exit_at(id, t0() + Duration::minutes(3)).unwrap();
    let before = store.access_record(id).unwrap().clone();

    assert_eq!(store.set_pegasus_link(id, true).unwrap_err(), StoreError::RecordClosed(id));
    assert_eq!(store.set_patio_color(id, PatioColor::Red).unwrap_err(), StoreError::RecordClosed(id));
    assert_eq!(store.set_speed_average(id, 10.0).unwrap_err(), StoreError::RecordClosed(id));
    assert_eq!(store.access_record(id).unwrap(), &before);
}

#[test]
fn test_record_creation_rejects_bad_input() {
    let mut store = EntityStore::new();
    let err = store
        .add_access_record_at(NewAccessRecord::new("  ", VehicleType::Normal), t0())
        .unwrap_err();
    assert_eq!(err, StoreError::Validation(ValidationError::BlankField { field: "plate" }));

    let err = store
        .add_access_record_at(
            NewAccessRecord::new("ABC-1234", VehicleType::Normal).at_location(Location::Exited),
            t0(),
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(ValidationError::IllegalInitialLocation { .. })));

    let record = store
        .add_access_record_at(NewAccessRecord::new("ABC-1234", VehicleType::Normal), t0())
        .unwrap();
    assert_eq!(record.id, RecordId(1));
}

#[test]
fn test_record_driver_fields_are_normalized() {
    let mut store = EntityStore::new();
    let record = store
        .add_access_record_at(
            NewAccessRecord::new("ABC-1234", VehicleType::Normal)
                .with_driver("  Pedro Santos ", "11122233344")
                .with_destination("   "),
            t0(),
        )
        .unwrap();
    assert_eq!(record.driver_name.as_deref(), Some("Pedro Santos"));
    assert_eq!(record.document.as_deref(), Some("111.222.333-44"));
    assert!(record.destination.is_none());
}
