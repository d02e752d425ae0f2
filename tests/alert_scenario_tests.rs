//! Alert scenarios evaluated over a live store

use chrono::{DateTime, Duration, TimeZone, Utc};
use yard_access_monitor::error::{StoreError, ValidationError};
use yard_access_monitor::store::{EntityStore, NewAccessRecord};
use yard_access_monitor::timing::{evaluate_alerts, yard_dwell, AlertKind, AlertMonitor, AlertThresholds};
use yard_access_monitor::types::{AlertSeverity, Location, VehicleType, YardConfig};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap()
}

/// Screened vehicle with an appointment that closed before now
#[test]
fn test_overdue_appointment_raises_one_danger_alert() {
    let mut store = EntityStore::new();
    let appointment = t0();
    let id = store
        .add_access_record_at(
            NewAccessRecord::new("ABC-1234", VehicleType::Normal)
                .with_appointment(appointment, Duration::minutes(15)),
            t0() - Duration::minutes(30),
        )
        .unwrap()
        .id;

    // Window closed ten minutes ago
    let now = appointment + Duration::minutes(25);
    let alerts = evaluate_alerts(store.access_records(), now, &AlertThresholds::default());

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].record, id);
    assert_eq!(alerts[0].kind, AlertKind::AppointmentOverdue);
    assert_eq!(alerts[0].severity, AlertSeverity::Danger);
    assert!(alerts[0].message.contains("ABC-1234"));

    // Inside the window nothing is raised
    let early = appointment + Duration::minutes(10);
    assert!(evaluate_alerts(store.access_records(), early, &AlertThresholds::default()).is_empty());
}

/// Two vehicles idle on the road, a third that reached PC1 in time
#[test]
fn test_stuck_in_transit_scenario() {
    let mut store = EntityStore::new();
    let mut ids = Vec::new();
    for plate in ["AAA1A11", "BBB2B22", "CCC3C33"] {
        let id = store
            .add_access_record_at(NewAccessRecord::new(plate, VehicleType::Normal), t0())
            .unwrap()
            .id;
        store.advance_to_pc1_route_at(id, t0()).unwrap();
        ids.push(id);
    }
    store.arrive_at_pc1_at(ids[2], t0() + Duration::minutes(4)).unwrap();

    let now = t0() + Duration::minutes(6);
    let alerts = evaluate_alerts(store.access_records(), now, &AlertThresholds::default());

    assert_eq!(alerts.len(), 2);
    assert!(alerts.iter().all(|a| a.kind == AlertKind::StuckInTransit));
    assert!(alerts.iter().all(|a| a.severity == AlertSeverity::Warning));
    assert_eq!(alerts[0].record, ids[0]);
    assert_eq!(alerts[1].record, ids[1]);
}

/// Exactly at the threshold is not stuck yet
#[test]
fn test_stuck_threshold_is_exclusive() {
    let mut store = EntityStore::new();
    let id = store
        .add_access_record_at(NewAccessRecord::new("ABC-1234", VehicleType::Normal), t0())
        .unwrap()
        .id;
    store.advance_to_pc1_route_at(id, t0()).unwrap();

    let thresholds = AlertThresholds::default();
    let at_limit = t0() + thresholds.stuck_in_transit;
    assert!(evaluate_alerts(store.access_records(), at_limit, &thresholds).is_empty());
    let past = at_limit + Duration::seconds(1);
    assert_eq!(evaluate_alerts(store.access_records(), past, &thresholds).len(), 1);
}

/// The terminal leg uses the PC1 exit as its start
#[test]
fn test_stuck_on_terminal_route_counts_from_pc1_exit() {
    let mut store = EntityStore::new();
    let id = store
        .add_access_record_at(NewAccessRecord::new("ABC-1234", VehicleType::Service), t0())
        .unwrap()
        .id;
    store.advance_to_pc1_route_at(id, t0()).unwrap();
    store.arrive_at_pc1_at(id, t0() + Duration::minutes(1)).unwrap();
    store.advance_to_terminal_route_at(id, t0() + Duration::minutes(30)).unwrap();

    let thresholds = AlertThresholds::default();
    let now = t0() + Duration::minutes(33);
    assert!(evaluate_alerts(store.access_records(), now, &thresholds).is_empty());

    let now = t0() + Duration::minutes(36);
    let alerts = evaluate_alerts(store.access_records(), now, &thresholds);
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].message.contains("Em Rota p/ Terminal"));
}

/// A record created on the road is timed from its supplied yard exit
#[test]
fn test_mid_journey_record_can_go_stuck() {
    let mut store = EntityStore::new();
    let bare = store.add_access_record_at(
        NewAccessRecord::new("ABC-1234", VehicleType::Normal).at_location(Location::EnRouteToPc1),
        t0(),
    );
    assert!(matches!(
        bare,
        Err(StoreError::Validation(ValidationError::MissingStage { location: Location::EnRouteToPc1, .. }))
    ));
    assert!(store.access_records().is_empty());

    let id = store
        .add_access_record_at(
            NewAccessRecord::new("ABC-1234", VehicleType::Normal)
                .at_location(Location::EnRouteToPc1)
                .with_patio_entry(t0()),
            t0(),
        )
        .unwrap()
        .id;

    let later = t0() + Duration::hours(3);
    let alerts = evaluate_alerts(store.access_records(), later, &AlertThresholds::default());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::StuckInTransit);

    store.arrive_at_pc1_at(id, later).unwrap();
    let record = store.access_record(id).unwrap();
    assert_eq!(record.patio_entry_timestamp, Some(t0()));
    assert_eq!(record.patio_exit_timestamp, Some(later));
    assert_eq!(yard_dwell(record), Some(Duration::hours(3)));
}

#[test]
fn test_low_speed_only_while_en_route() {
    let mut store = EntityStore::new();
    let moving = store
        .add_access_record_at(
            NewAccessRecord::new("SLO1W00", VehicleType::Normal)
                .at_location(Location::EnRouteToPc1)
                .with_patio_entry(t0())
                .with_speed_average(12.0),
            t0(),
        )
        .unwrap()
        .id;
    store
        .add_access_record_at(
            NewAccessRecord::new("PAR4K00", VehicleType::Normal).with_speed_average(5.0),
            t0(),
        )
        .unwrap();

    let alerts = evaluate_alerts(store.access_records(), t0() + Duration::minutes(1), &AlertThresholds::default());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].record, moving);
    assert_eq!(alerts[0].kind, AlertKind::LowSpeed);
}

#[test]
fn test_untracked_and_closed_records_never_alert() {
    let mut store = EntityStore::new();
    store
        .add_access_record_at(
            NewAccessRecord::new("CEG0N00", VehicleType::Cegonha)
                .with_appointment(t0() - Duration::hours(3), Duration::minutes(15)),
            t0() - Duration::hours(4),
        )
        .unwrap();
    let closed = store
        .add_access_record_at(
            NewAccessRecord::new("OUT1X11", VehicleType::Normal)
                .at_location(Location::EnRouteToTerminal)
                .with_patio_entry(t0() - Duration::hours(4))
                .with_patio_exit(t0() - Duration::hours(4))
                .with_pc1_entry(t0() - Duration::hours(4))
                .with_pc1_exit(t0() - Duration::hours(4)),
            t0() - Duration::hours(4),
        )
        .unwrap()
        .id;
    store.register_exit_at(closed, t0() - Duration::hours(3)).unwrap();

    assert!(evaluate_alerts(store.access_records(), t0(), &AlertThresholds::default()).is_empty());
}

#[test]
fn test_danger_alerts_sort_first() {
    let mut store = EntityStore::new();
    let stuck = store
        .add_access_record_at(NewAccessRecord::new("AAA1A11", VehicleType::Normal), t0())
        .unwrap()
        .id;
    store.advance_to_pc1_route_at(stuck, t0()).unwrap();
    let overdue = store
        .add_access_record_at(
            NewAccessRecord::new("BBB2B22", VehicleType::Normal)
                .with_appointment(t0(), Duration::minutes(5)),
            t0(),
        )
        .unwrap()
        .id;

    let alerts = evaluate_alerts(store.access_records(), t0() + Duration::minutes(10), &AlertThresholds::default());
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].record, overdue);
    assert_eq!(alerts[1].record, stuck);
}

#[test]
fn test_monitor_uses_configured_thresholds() {
    let config = YardConfig { stuck_in_transit_minutes: 20, ..Default::default() };
    let mut monitor = AlertMonitor::new(AlertThresholds::from(&config));
    assert!(monitor.current().is_empty());
    assert!(monitor.evaluated_at().is_none());

    let mut store = EntityStore::new();
    let id = store
        .add_access_record_at(NewAccessRecord::new("ABC-1234", VehicleType::Normal), t0())
        .unwrap()
        .id;
    store.advance_to_pc1_route_at(id, t0()).unwrap();

    let now = t0() + Duration::minutes(10);
    assert!(monitor.refresh(store.access_records(), now).is_empty());
    assert_eq!(monitor.evaluated_at(), Some(now));

    let later = t0() + Duration::minutes(25);
    assert_eq!(monitor.refresh(store.access_records(), later).len(), 1);
    assert_eq!(monitor.current()[0].kind, AlertKind::StuckInTransit);
    assert_eq!(monitor.thresholds().stuck_in_transit, Duration::minutes(20));
}
