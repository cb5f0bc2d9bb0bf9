use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use glam::DVec3;
use mockall::predicate::{always, eq};
use rstest::{fixture, rstest};

use super::*;
use crate::shape::VerticalExtent;
use crate::DEFAULT_WARNING_DISTANCE;

const WORLD: WorldId = WorldId(1);

type Changes = Rc<RefCell<Vec<BorderChange>>>;

#[fixture]
fn column() -> RegionBorder {
    RegionBorder::new(
        WORLD,
        BoxBoundary::new(100.0, DVec3::ZERO, VerticalExtent::Unbounded),
    )
}

fn recording(border: &mut RegionBorder) -> Changes {
    let changes: Changes = Rc::default();
    let sink = Rc::clone(&changes);
    border.add_listener(Box::new(move |_: WorldId, change: &BorderChange| {
        sink.borrow_mut().push(*change);
    }));
    changes
}

fn run(border: &mut RegionBorder, ticks: u64) -> Vec<MotionChange> {
    let nobody: Vec<Occupant> = Vec::new();
    let mut sink: Vec<DamageReport> = Vec::new();
    (0..ticks)
        .filter_map(|_| border.tick(&nobody, &mut sink))
        .collect()
}

#[rstest]
fn lerp_announces_start_synchronously(mut column: RegionBorder) {
    let mut listener = MockChangeListener::new();
    listener
        .expect_on_change()
        .with(
            eq(WORLD),
            eq(BorderChange::Size(LerpAnnouncement {
                start: 100.0,
                end: 50.0,
                remaining_ticks: 200,
                remaining_millis: 10_000,
                nominal_millis: 10_000,
                reason: AnnounceReason::Started,
            })),
        )
        .times(1)
        .return_const(());
    column.add_listener(Box::new(listener));

    column
        .lerp_size_between(100.0, 50.0, 10_000)
        .expect("valid lerp");
    assert_eq!(column.status(), MotionStatus::Shrinking);
}

#[rstest]
#[case(-1, BorderError::InvalidDuration { millis: -1 })]
#[case(i64::MIN, BorderError::InvalidDuration { millis: i64::MIN })]
fn negative_duration_leaves_border_untouched(
    mut column: RegionBorder,
    #[case] millis: i64,
    #[case] expected: BorderError,
) {
    let mut listener = MockChangeListener::new();
    listener.expect_on_change().never();
    column.add_listener(Box::new(listener));

    assert_eq!(column.lerp_size_between(100.0, 10.0, millis), Err(expected));
    assert_eq!(
        column.lerp_center_between(DVec3::ZERO, DVec3::ONE, millis),
        Err(expected)
    );
    assert!(!column.is_moving());
    assert_relative_eq!(column.size(), 100.0);
}

#[rstest]
fn non_finite_values_are_rejected(mut column: RegionBorder) {
    assert_eq!(
        column.set_size_instant(f64::NAN),
        Err(BorderError::NonFinite { what: "size" })
    );
    assert_eq!(
        column.set_center_instant(DVec3::new(0.0, f64::INFINITY, 0.0)),
        Err(BorderError::NonFinite { what: "center" })
    );
    assert!(column.set_safe_zone(f64::NAN).is_err());
    assert_relative_eq!(column.size(), 100.0);
}

#[rstest]
#[case(0.0, MIN_BORDER_SIZE)]
#[case(-40.0, MIN_BORDER_SIZE)]
#[case(1.0e12, MAX_BORDER_SIZE)]
fn sizes_are_clamped(mut column: RegionBorder, #[case] requested: f64, #[case] applied: f64) {
    column.set_size_instant(requested).expect("finite size");
    assert_relative_eq!(column.size(), applied);
}

#[rstest]
fn centers_are_clamped(mut column: RegionBorder) {
    column
        .set_center_instant(DVec3::new(1.0e9, 64.0, -1.0e9))
        .expect("finite center");
    assert_eq!(
        column.center(),
        DVec3::new(MAX_CENTER_COORDINATE, 64.0, -MAX_CENTER_COORDINATE)
    );
}

#[rstest]
fn instant_set_cancels_and_reports_previous_value(mut column: RegionBorder) {
    column
        .lerp_size_between(100.0, 50.0, 10_000)
        .expect("valid lerp");
    run(&mut column, 100);
    let changes = recording(&mut column);

    column.set_size_instant(30.0).expect("finite size");

    assert!(!column.is_moving());
    assert_eq!(column.status(), MotionStatus::Stationary);
    let recorded = changes.borrow();
    let [BorderChange::Size(announcement)] = recorded.as_slice() else {
        panic!("expected one size change, got {recorded:?}");
    };
    assert_relative_eq!(announcement.start, 75.0, epsilon = 1e-9);
    assert_relative_eq!(announcement.end, 30.0);
    assert_eq!(announcement.remaining_ticks, 0);
    assert_eq!(announcement.nominal_millis, 0);
}

#[rstest]
fn in_flight_transition_is_reannounced_each_second(mut column: RegionBorder) {
    let changes = recording(&mut column);
    column
        .lerp_size_between(100.0, 50.0, 10_000)
        .expect("valid lerp");
    run(&mut column, 19);
    assert_eq!(changes.borrow().len(), 1);

    run(&mut column, 21);
    let recorded = changes.borrow();
    let refreshes: Vec<_> = recorded
        .iter()
        .filter_map(|change| match change {
            BorderChange::Size(a) if a.reason == AnnounceReason::Refresh => Some(*a),
            _ => None,
        })
        .collect();
    let [first, second] = refreshes.as_slice() else {
        panic!("expected two refreshes, got {refreshes:?}");
    };
    assert_relative_eq!(first.start, 95.0, epsilon = 1e-9);
    assert_relative_eq!(first.end, 50.0);
    assert_eq!(first.remaining_ticks, 180);
    assert_eq!(first.remaining_millis, 9_000);
    assert_eq!(first.nominal_millis, 10_000);
    assert_eq!(second.remaining_ticks, 160);
}

fn refresh_counts(changes: &Changes) -> (usize, usize) {
    changes
        .borrow()
        .iter()
        .fold((0, 0), |(size, center), change| match change {
            BorderChange::Size(a) if a.reason == AnnounceReason::Refresh => (size + 1, center),
            BorderChange::Center(a) if a.reason == AnnounceReason::Refresh => (size, center + 1),
            _ => (size, center),
        })
}

#[rstest]
fn instant_center_sets_keep_size_cadence(mut column: RegionBorder) {
    let changes = recording(&mut column);
    column
        .lerp_size_between(100.0, 50.0, 10_000)
        .expect("valid lerp");
    for _ in 0..100 {
        column.set_center_instant(DVec3::ZERO).expect("finite center");
        run(&mut column, 1);
    }
    assert!(column.is_moving());
    assert_eq!(refresh_counts(&changes), (5, 0));
}

#[rstest]
fn instant_size_sets_keep_center_cadence(mut column: RegionBorder) {
    let changes = recording(&mut column);
    column
        .lerp_center_between(DVec3::ZERO, DVec3::new(50.0, 0.0, 0.0), 10_000)
        .expect("valid lerp");
    for _ in 0..100 {
        column.set_size_instant(100.0).expect("finite size");
        run(&mut column, 1);
    }
    assert!(column.is_moving());
    assert_eq!(refresh_counts(&changes), (0, 5));
}

#[rstest]
fn restarting_one_transition_leaves_the_other_on_schedule(mut column: RegionBorder) {
    let changes = recording(&mut column);
    column
        .lerp_size_between(100.0, 50.0, 10_000)
        .expect("valid lerp");
    run(&mut column, 10);
    column
        .lerp_center_between(DVec3::ZERO, DVec3::new(50.0, 0.0, 0.0), 10_000)
        .expect("valid lerp");
    run(&mut column, 10);
    assert_eq!(refresh_counts(&changes), (1, 0));
    run(&mut column, 10);
    assert_eq!(refresh_counts(&changes), (1, 1));
}

#[rstest]
fn observed_rate_only_changes_remaining_time(mut column: RegionBorder) {
    let changes = recording(&mut column);
    column.set_observed_tick_rate(10.0);
    column
        .lerp_size_between(100.0, 50.0, 10_000)
        .expect("valid lerp");
    let recorded = changes.borrow();
    let Some(BorderChange::Size(started)) = recorded.first() else {
        panic!("expected a size announcement");
    };
    assert_eq!(started.remaining_ticks, 200);
    assert_eq!(started.remaining_millis, 20_000);
    assert_eq!(started.nominal_millis, 10_000);
}

#[rstest]
fn center_and_size_report_motion_independently(mut column: RegionBorder) {
    column
        .lerp_size_between(100.0, 80.0, 1_000)
        .expect("valid lerp");
    column
        .lerp_center_between(DVec3::ZERO, DVec3::new(20.0, 0.0, 0.0), 2_000)
        .expect("valid lerp");

    assert!(run(&mut column, 20).is_empty());
    assert_relative_eq!(column.size(), 80.0);
    assert!(column.is_moving());
    assert_eq!(column.status(), MotionStatus::Stationary);

    assert_eq!(run(&mut column, 20), vec![MotionChange::BecameStationary]);
    assert_eq!(column.center(), DVec3::new(20.0, 0.0, 0.0));
}

#[rstest]
fn damage_signalled_beyond_safe_zone(column: RegionBorder) {
    let mut border = column;
    let mut occupants = MockOccupantProvider::new();
    occupants.expect_occupants().with(eq(WORLD)).return_const(vec![
        Occupant::new(1, DVec3::new(70.0, 1_000.0, 0.0)),
        Occupant::new(2, DVec3::new(54.0, 0.0, 0.0)),
        Occupant::new(3, DVec3::new(10.0, 0.0, 10.0)),
    ]);
    let mut sink = MockDamageSink::new();
    sink.expect_apply_damage()
        .with(
            eq(OccupantId(1)),
            eq(3),
            eq(DamageCause::OutsideBorder {
                world: WORLD,
                distance: 20.0,
            }),
        )
        .times(1)
        .return_const(());
    sink.expect_apply_damage()
        .with(eq(OccupantId(2)), always(), always())
        .never();

    border.tick(&occupants, &mut sink);
}

#[rstest]
fn damage_has_minimum_of_one(column: RegionBorder) {
    let (amount, distance) = column
        .damage_at(DVec3::new(55.5, 0.0, 0.0))
        .expect("outside safe zone");
    assert_eq!(amount, 1);
    assert_relative_eq!(distance, 5.5);
    assert_eq!(column.damage_at(DVec3::new(55.0, 0.0, 0.0)), None);
}

#[rstest]
#[case(DVec3::new(46.0, 0.0, 0.0), true)]
#[case(DVec3::new(40.0, 0.0, 0.0), false)]
#[case(DVec3::new(80.0, 0.0, 0.0), true)]
fn warning_zone_when_stationary(
    column: RegionBorder,
    #[case] point: DVec3,
    #[case] expected: bool,
) {
    assert_relative_eq!(column.warning_threshold(), DEFAULT_WARNING_DISTANCE);
    assert_eq!(column.is_in_warning_zone(point), expected);
}

#[rstest]
fn warning_zone_widens_while_shrinking(mut column: RegionBorder) {
    column
        .lerp_size_between(100.0, 1.0, 10_000)
        .expect("valid lerp");
    // Edge speed: 99 / 2 / 200 ticks at 20 ticks per second.
    assert_relative_eq!(column.warning_threshold(), 4.95 * 15.0, epsilon = 1e-9);
    assert!(column.is_in_warning_zone(DVec3::ZERO));

    column
        .lerp_size_between(100.0, 200.0, 10_000)
        .expect("valid lerp");
    assert_relative_eq!(column.warning_threshold(), DEFAULT_WARNING_DISTANCE);
}

#[rstest]
fn settings_changes_are_announced_and_floored(mut column: RegionBorder) {
    let changes = recording(&mut column);
    column.set_damage_per_block(-3.0).expect("finite");
    column.set_safe_zone(2.5).expect("finite");
    column.set_warning_distance(8.0).expect("finite");
    column.set_warning_time(30);

    assert_eq!(
        changes.borrow().as_slice(),
        &[
            BorderChange::DamagePerBlock(0.0),
            BorderChange::SafeZone(2.5),
            BorderChange::WarningDistance(8.0),
            BorderChange::WarningTime(30),
        ]
    );
    assert_eq!(
        *column.settings(),
        BorderSettings {
            damage_per_block: 0.0,
            safe_zone: 2.5,
            warning_distance: 8.0,
            warning_time_secs: 30,
        }
    );
}

#[rstest]
fn snapshot_resumes_pending_transition(mut column: RegionBorder) {
    column
        .lerp_size_between(100.0, 50.0, 10_000)
        .expect("valid lerp");
    column
        .lerp_center_between(DVec3::ZERO, DVec3::new(0.0, 0.0, 40.0), 4_000)
        .expect("valid lerp");
    run(&mut column, 40);

    let json = column.snapshot().to_json().expect("serialisable");
    let snapshot = BorderSnapshot::from_json(&json).expect("parsable");
    assert_eq!(
        snapshot.size_transition,
        Some(PendingTransition {
            target: 50.0,
            remaining_ticks: 160,
        })
    );

    let mut restored = RegionBorder::new(
        WorldId(2),
        BoxBoundary::new(10.0, DVec3::ZERO, VerticalExtent::Unbounded),
    );
    restored.restore(&snapshot).expect("finite snapshot");
    assert_relative_eq!(restored.size(), column.size());
    assert_eq!(restored.center(), column.center());

    run(&mut restored, 159);
    assert!(restored.is_moving());
    run(&mut restored, 1);
    assert!(!restored.is_moving());
    assert_relative_eq!(restored.size(), 50.0);
    assert_eq!(restored.center(), DVec3::new(0.0, 0.0, 40.0));
}

#[rstest]
fn stationary_snapshot_omits_transitions(column: RegionBorder) {
    let json = column.snapshot().to_json().expect("serialisable");
    assert!(!json.contains("size_transition"));
    let snapshot = BorderSnapshot::from_json(&json).expect("parsable");
    assert_eq!(snapshot.center_transition, None);
    assert_relative_eq!(snapshot.size, 100.0);
}
