// libs/appointment-cell/tests/availability_test.rs
// Availability engine tests: conflict classes, slot suggestion, occupancy.

use chrono::NaiveDate;
use uuid::Uuid;

use appointment_cell::models::*;
use appointment_cell::services::*;
use settings_cell::SalonSettings;
use shared_models::time::ClockTime;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

fn at(raw: &str) -> ClockTime {
    raw.parse().unwrap()
}

fn appointment(time: &str, status: AppointmentStatus, service_id: Option<Uuid>, price: f64) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        client_id: Uuid::new_v4(),
        service_id,
        date: date(),
        time: at(time),
        status,
        service_label: Some("Corte".to_string()),
        price,
        notes: None,
        reminder: false,
    }
}

fn service(duration_minutes: u32) -> Service {
    Service {
        id: Uuid::new_v4(),
        name: "Tinte".to_string(),
        base_price: 40.0,
        sale_price: 45.0,
        duration_minutes,
        category_id: None,
        uses_inventory: true,
    }
}

/// One 45-minute appointment at 10:00, occupying [600, 645).
fn forty_five_at_ten() -> (Vec<ScheduledAppointment>, Service) {
    let dye = service(45);
    let table = DurationTable::new(&[dye.clone()], 30);
    let day = table.schedule(vec![appointment("10:00", AppointmentStatus::Confirmed, Some(dye.id), 45.0)]);
    (day, dye)
}

fn unavailable_kinds(outcome: &AvailabilityOutcome) -> Vec<ConflictKind> {
    match outcome {
        AvailabilityOutcome::Unavailable { conflicts, .. } => conflicts.iter().map(|c| c.kind).collect(),
        AvailabilityOutcome::Available { .. } => panic!("expected unavailable, got {:?}", outcome),
    }
}

// ==============================================================================
// CONFLICT DETECTION
// ==============================================================================

#[test]
fn test_worked_example_from_ten_oclock_booking() {
    let (day, _) = forty_five_at_ten();
    let detector = ConflictDetectionService::new(30);

    assert_eq!(day[0].interval, Interval { start: 600, end: 645 });

    let inside = detector.evaluate(at("10:15"), 30, false, &day);
    assert_eq!(unavailable_kinds(&inside), vec![ConflictKind::Overlap]);

    let too_close = detector.evaluate(at("10:50"), 30, false, &day);
    assert_eq!(unavailable_kinds(&too_close), vec![ConflictKind::InsufficientSpacing]);

    let clear = detector.evaluate(at("11:15"), 30, false, &day);
    assert!(clear.is_available());
}

#[test]
fn test_identical_start_is_exact_conflict() {
    let table = DurationTable::new(&[], 30);
    let day = table.schedule(vec![appointment("09:00", AppointmentStatus::Pending, None, 20.0)]);

    let outcome = ConflictDetectionService::new(30).evaluate(at("09:00"), 30, false, &day);

    match outcome {
        AvailabilityOutcome::Unavailable { conflicts, message } => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].kind, ConflictKind::Exact);
            assert_eq!(conflicts[0].time, at("09:00"));
            assert!(message.contains("09:00"));
        }
        other => panic!("expected exact conflict, got {:?}", other),
    }
}

#[test]
fn test_exact_conflicts_take_precedence_over_soft_ones() {
    let table = DurationTable::new(&[], 30);
    let day = table.schedule(vec![
        appointment("09:00", AppointmentStatus::Confirmed, None, 0.0),
        appointment("09:15", AppointmentStatus::Pending, None, 0.0),
    ]);

    let outcome = ConflictDetectionService::new(30).evaluate(at("09:00"), 30, false, &day);
    assert_eq!(unavailable_kinds(&outcome), vec![ConflictKind::Exact]);
}

#[test]
fn test_only_active_statuses_hard_conflict() {
    let table = DurationTable::new(&[], 30);
    let day = table.schedule(vec![appointment("09:00", AppointmentStatus::Done, None, 0.0)]);

    // A finished appointment at the same time still occupies the chair
    let outcome = ConflictDetectionService::new(30).evaluate(at("09:00"), 30, false, &day);
    assert_eq!(unavailable_kinds(&outcome), vec![ConflictKind::Overlap]);
}

#[test]
fn test_cancelled_rows_never_conflict() {
    let table = DurationTable::new(&[], 30);
    let day = table.schedule(vec![appointment("09:00", AppointmentStatus::Cancelled, None, 0.0)]);

    let outcome = ConflictDetectionService::new(30).evaluate(at("09:00"), 30, false, &day);
    assert!(outcome.is_available());
}

#[test]
fn test_gap_equal_to_interval_is_allowed() {
    let table = DurationTable::new(&[], 30);
    let day = table.schedule(vec![appointment("10:00", AppointmentStatus::Pending, None, 0.0)]);
    let detector = ConflictDetectionService::new(30);

    // [600, 630) then 11:00 leaves exactly 30 minutes
    assert!(detector.evaluate(at("11:00"), 30, false, &day).is_available());
    // 10:59 leaves 29
    assert_eq!(
        unavailable_kinds(&detector.evaluate(at("10:59"), 30, false, &day)),
        vec![ConflictKind::InsufficientSpacing]
    );
    // Spacing applies before the existing appointment too: [540, 570) ends 30 before 10:00
    assert!(detector.evaluate(at("09:00"), 30, false, &day).is_available());
    assert_eq!(
        unavailable_kinds(&detector.evaluate(at("09:10"), 30, false, &day)),
        vec![ConflictKind::InsufficientSpacing]
    );
}

#[test]
fn test_back_to_back_is_not_a_spacing_violation() {
    let table = DurationTable::new(&[], 30);
    let day = table.schedule(vec![appointment("10:00", AppointmentStatus::Pending, None, 0.0)]);

    let outcome = ConflictDetectionService::new(30).evaluate(at("10:30"), 30, false, &day);
    assert!(outcome.is_available());
}

#[test]
fn test_allowing_overlap_reports_union_occupancy() {
    let table = DurationTable::new(&[], 30);
    let day = table.schedule(vec![
        appointment("10:00", AppointmentStatus::Pending, None, 0.0),
        appointment("10:20", AppointmentStatus::Confirmed, None, 0.0),
        appointment("13:00", AppointmentStatus::Confirmed, None, 0.0),
    ]);

    let outcome = ConflictDetectionService::new(30).evaluate(at("10:00"), 30, true, &day);

    match outcome {
        AvailabilityOutcome::Available { overlaps, total_occupied_minutes } => {
            assert_eq!(overlaps.len(), 2);
            assert_eq!(overlaps[0].kind, ConflictKind::Exact);
            assert_eq!(overlaps[1].kind, ConflictKind::Overlap);
            // [600, 630) and [620, 650) span 50 minutes, not the 90 of a plain sum
            assert_eq!(total_occupied_minutes, Some(50));
        }
        other => panic!("expected available, got {:?}", other),
    }
}

#[test]
fn test_allowing_overlap_without_intersections_has_no_total() {
    let table = DurationTable::new(&[], 30);
    let day = table.schedule(vec![appointment("10:00", AppointmentStatus::Pending, None, 0.0)]);

    let outcome = ConflictDetectionService::new(30).evaluate(at("10:40"), 30, true, &day);
    assert_eq!(
        outcome,
        AvailabilityOutcome::Available { overlaps: Vec::new(), total_occupied_minutes: None }
    );
}

#[test]
fn test_unknown_service_uses_default_duration() {
    let table = DurationTable::new(&[service(90)], 30);
    let entry = table.place(appointment("10:00", AppointmentStatus::Pending, Some(Uuid::new_v4()), 0.0));
    assert_eq!(entry.duration_minutes(), 30);
    assert_eq!(table.duration_for(None), 30);
}

#[test]
fn test_evaluation_is_idempotent() {
    let (day, _) = forty_five_at_ten();
    let detector = ConflictDetectionService::new(30);

    let first = detector.evaluate(at("10:15"), 30, false, &day);
    let second = detector.evaluate(at("10:15"), 30, false, &day);
    assert_eq!(first, second);
}

#[test]
fn test_classification_is_exclusive_over_a_minute_grid() {
    let (day, _) = forty_five_at_ten();
    let detector = ConflictDetectionService::new(30);
    let existing = day[0].interval;

    for minute in (8 * 60)..(13 * 60) {
        let start = ClockTime::from_minutes(minute).unwrap();
        let candidate = Interval::new(start, 30);
        let kind = detector.classify(&candidate, &day[0]);

        let intersects = candidate.start < existing.end && existing.start < candidate.end;
        let gap = candidate.gap_to(&existing);

        match kind {
            Some(ConflictKind::Exact) => assert_eq!(candidate.start, existing.start),
            Some(ConflictKind::Overlap) => assert!(intersects),
            Some(ConflictKind::InsufficientSpacing) => {
                assert!(matches!(gap, Some(g) if g > 0 && g < 30))
            }
            None => assert!(!intersects && !matches!(gap, Some(g) if g > 0 && g < 30)),
        }
    }
}

// ==============================================================================
// SLOT SUGGESTION
// ==============================================================================

#[test]
fn test_suggestions_on_an_empty_day() {
    let suggester = SlotSuggester::from_settings(&SalonSettings::default());
    let slots = suggester.suggest(&[], 30);

    assert_eq!(slots.len(), 8);
    assert_eq!(slots.first(), Some(&at("09:00")));
    assert_eq!(slots.last(), Some(&at("12:30")));
}

#[test]
fn test_suggestions_avoid_occupied_time() {
    let (day, _) = forty_five_at_ten();
    let occupied: Vec<Interval> = day.iter().map(|entry| entry.interval).collect();
    let suggester = SlotSuggester::from_settings(&SalonSettings::default());

    let slots = suggester.suggest(&occupied, 30);
    let rendered: Vec<String> = slots.iter().map(ToString::to_string).collect();

    // 09:30 ends exactly at 10:00; 10:00 and 10:30 overlap; 11:00 is only 15 minutes after
    assert_eq!(
        rendered,
        vec!["09:00", "09:30", "11:30", "12:00", "12:30", "13:00", "13:30", "14:00"]
    );
}

#[test]
fn test_suggestions_respect_invariants() {
    let table = DurationTable::new(&[], 30);
    let day = table.schedule(vec![
        appointment("09:00", AppointmentStatus::Pending, None, 0.0),
        appointment("11:10", AppointmentStatus::Confirmed, None, 0.0),
        appointment("15:45", AppointmentStatus::Pending, None, 0.0),
        appointment("19:30", AppointmentStatus::Pending, None, 0.0),
    ]);
    let occupied: Vec<Interval> = day.iter().map(|entry| entry.interval).collect();
    let suggester = SlotSuggester::new(at("09:00"), at("20:00"), 15, 40);

    let slots = suggester.suggest(&occupied, 30);
    assert!(!slots.is_empty());
    assert!(slots.windows(2).all(|pair| pair[0] < pair[1]));

    for slot in &slots {
        let candidate = Interval::new(*slot, 30);
        assert!(candidate.start >= 9 * 60 && candidate.end <= 20 * 60);
        for other in &occupied {
            assert!(!candidate.intersects(other), "{} intersects {:?}", slot, other);
            assert!(!candidate.too_close_to(other, 15), "{} too close to {:?}", slot, other);
        }
    }
}

#[test]
fn test_suggestions_stop_at_window_end() {
    let suggester = SlotSuggester::new(at("19:00"), at("20:00"), 30, 8);

    assert_eq!(suggester.suggest(&[], 30), vec![at("19:00"), at("19:30")]);
    assert_eq!(suggester.suggest(&[], 60), vec![at("19:00")]);
    assert!(suggester.suggest(&[], 90).is_empty());
}

// ==============================================================================
// OCCUPANCY
// ==============================================================================

#[test]
fn test_occupancy_counts_and_revenue() {
    let long = service(60);
    let table = DurationTable::new(&[long.clone()], 30);
    let day = table.schedule(vec![
        appointment("09:00", AppointmentStatus::Pending, None, 10.0),
        appointment("10:00", AppointmentStatus::Pending, Some(long.id), 15.0),
        appointment("11:00", AppointmentStatus::Pending, None, 20.0),
        appointment("12:00", AppointmentStatus::Confirmed, None, 30.0),
        appointment("13:00", AppointmentStatus::Confirmed, None, 35.0),
        appointment("14:00", AppointmentStatus::Done, None, 25.0),
        appointment("15:00", AppointmentStatus::Cancelled, Some(long.id), 99.0),
    ]);

    let report = OccupancyReporter::new(SalonSettings::default()).report(date(), day);

    assert_eq!(report.total_appointments, 7);
    assert_eq!(report.by_status.get(AppointmentStatus::Pending), 3);
    assert_eq!(report.by_status.get(AppointmentStatus::Confirmed), 2);
    assert_eq!(report.by_status.get(AppointmentStatus::Done), 1);
    assert_eq!(report.by_status.get(AppointmentStatus::Cancelled), 1);
    assert_eq!(report.by_status.get(AppointmentStatus::Rescheduled), 0);

    assert_eq!(report.realized_revenue, 25.0);
    assert_eq!(report.estimated_revenue, 110.0);
    assert_eq!(report.formatted_revenue.realized, "$25.00");
    assert_eq!(report.formatted_revenue.estimated, "$110.00");

    // Five 30-minute rows plus one 60-minute row; the cancelled hour is excluded
    assert_eq!(report.total_occupied_minutes, 210);
    // 6 of 26 slots
    assert_eq!(report.utilization_percent, 23.08);
    assert!(report.conflicts.is_empty());
}

#[test]
fn test_occupancy_conflicts_and_free_slots() {
    let table = DurationTable::new(&[], 30);
    let day = table.schedule(vec![
        appointment("08:00", AppointmentStatus::Pending, None, 0.0),
        appointment("10:00", AppointmentStatus::Pending, None, 0.0),
        appointment("10:00", AppointmentStatus::Confirmed, None, 0.0),
        appointment("12:00", AppointmentStatus::Cancelled, None, 0.0),
        appointment("12:00", AppointmentStatus::Pending, None, 0.0),
    ]);

    let report = OccupancyReporter::new(SalonSettings::default()).report(date(), day);

    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].time, at("10:00"));
    assert_eq!(report.conflicts[0].appointment_ids.len(), 2);

    // 08:00 through 19:30 is 24 half-hour slots, three taken
    assert_eq!(report.free_slots.len(), 21);
    assert!(!report.free_slots.contains(&at("08:00")));
    assert!(!report.free_slots.contains(&at("10:00")));
    assert!(!report.free_slots.contains(&at("12:00")));
    assert!(report.free_slots.contains(&at("08:30")));
    assert_eq!(report.free_slots.last(), Some(&at("19:30")));
}

#[test]
fn test_occupancy_serializes_wire_names() {
    let table = DurationTable::new(&[], 30);
    let day = table.schedule(vec![appointment("09:00", AppointmentStatus::Done, None, 25.0)]);

    let report = OccupancyReporter::new(SalonSettings::default()).report(date(), day);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["fecha"], "2024-05-01");
    assert_eq!(json["citasPorEstado"]["REALIZADA"], 1);
    assert_eq!(json["citasPorEstado"]["PENDIENTE"], 0);
    assert_eq!(json["ingresosTotales"], 25.0);
    assert_eq!(json["tiempoTotalOcupado"], 30);
    assert_eq!(json["citas"][0]["status"], "REALIZADA");
    assert_eq!(json["horariosLibres"][0], "08:00");
}
