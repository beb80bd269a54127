mod helpers;

use airtime::daylist::DayListController;
use airtime::keys::{Key, KeyInput};
use airtime::programme::{Event, ServiceId};
use airtime::timebase::ONE_DAY_MS;
use helpers::{CaptureDaySource, FakeListSurface, FakeNavigator, event, test_tuning};

fn catchup_tuning() -> airtime::config::Tuning {
    let mut tuning = test_tuning(200, 5);
    tuning.catchup_enabled = true;
    tuning
}

fn day0_events(now: i64) -> Vec<Event> {
    vec![
        event(1, 1, now - 2000, now - 1000),
        event(1, 2, now - 1000, now + 1000),
        event(1, 3, now + 1000, now + 2000),
    ]
}

/// A refresh returning byte-identical data must not re-install the rows,
/// but selection still runs.
#[test]
fn identical_data_skips_redraw_but_reruns_selection() {
    let mut list = DayListController::new(test_tuning(200, 5));
    let mut source = CaptureDaySource::default();
    let mut surface = FakeListSurface::default();
    let now = 10 * ONE_DAY_MS;

    list.initialise(ServiceId(1), now);
    list.load_day_data(false, false, now, &mut source);
    list.on_day_data(source.batch_for(0, day0_events(now)), now, &mut surface);
    assert_eq!(surface.set_rows_calls, 1);
    assert_eq!(surface.select_calls, 1);
    assert_eq!(surface.selected, Some(1), "the live event");

    // periodic refresh: same data back
    list.load_day_data(true, false, now, &mut source);
    list.on_day_data(source.batch_for(1, day0_events(now)), now, &mut surface);
    assert_eq!(surface.set_rows_calls, 1, "no redraw for identical data");
    assert_eq!(surface.select_calls, 2, "selection re-ran anyway");
    assert_eq!(surface.selected, Some(1));
}

/// Paging to the next day carries the highlight's time-of-day across: the
/// target is the remembered time shifted one day per step of travel.
#[test]
fn day_move_carries_selection_time_across() {
    let mut list = DayListController::new(catchup_tuning());
    let mut nav = FakeNavigator::new(3, 3);
    let mut source = CaptureDaySource::default();
    let mut surface = FakeListSurface::default();
    let now = 10 * ONE_DAY_MS + 1500;

    list.initialise(ServiceId(1), now);
    list.load_day_data(false, false, now, &mut source);
    let today = vec![event(1, 1, 10 * ONE_DAY_MS + 1000, 10 * ONE_DAY_MS + 2000)];
    list.on_day_data(source.batch_for(0, today), now, &mut surface);
    assert_eq!(surface.selected, Some(0));

    let handled = list.handle_key(
        KeyInput::press(Key::Right),
        now,
        &mut nav,
        &mut source,
        &mut surface,
    );
    assert!(handled.consumed());
    assert_eq!(list.day_offset(), 1);
    assert_eq!(nav.back_calls, 1);
    assert_eq!(source.queries[1].day_offset, 1);

    let tomorrow = vec![
        event(1, 10, 11 * ONE_DAY_MS + 500, 11 * ONE_DAY_MS + 900),
        event(1, 11, 11 * ONE_DAY_MS + 1000, 11 * ONE_DAY_MS + 2000),
        event(1, 12, 11 * ONE_DAY_MS + 2000, 11 * ONE_DAY_MS + 3000),
    ];
    list.on_day_data(source.batch_for(1, tomorrow), now, &mut surface);
    // target is yesterday's 10day+1000 shifted forward one day
    assert_eq!(surface.selected, Some(1));
}

/// Up from the first row rolls into the previous day, but only when
/// catch-up permits past days.
#[test]
fn first_row_up_crosses_into_previous_day_with_catchup() {
    let now = 10 * ONE_DAY_MS;

    let mut list = DayListController::new(test_tuning(200, 5));
    let mut nav = FakeNavigator::new(3, 3);
    let mut source = CaptureDaySource::default();
    let mut surface = FakeListSurface::default();
    list.initialise(ServiceId(1), now);
    list.load_day_data(false, false, now, &mut source);
    list.on_day_data(source.batch_for(0, day0_events(now)), now, &mut surface);
    // selection sits on the live row; walk up to the first row first
    let _ = list.handle_key(KeyInput::press(Key::Up), now, &mut nav, &mut source, &mut surface);
    assert_eq!(surface.selected, Some(0));
    let _ = list.handle_key(KeyInput::press(Key::Up), now, &mut nav, &mut source, &mut surface);
    assert_eq!(list.day_offset(), 0, "yesterday unreachable without catch-up");
    assert_eq!(source.queries.len(), 1);

    let mut list = DayListController::new(catchup_tuning());
    list.initialise(ServiceId(1), now);
    list.load_day_data(false, false, now, &mut source);
    list.on_day_data(source.batch_for(1, day0_events(now)), now, &mut surface);
    let _ = list.handle_key(KeyInput::press(Key::Up), now, &mut nav, &mut source, &mut surface);
    let _ = list.handle_key(KeyInput::press(Key::Up), now, &mut nav, &mut source, &mut surface);
    assert_eq!(list.day_offset(), -1);
    assert_eq!(source.queries.last().unwrap().day_offset, -1);
    assert_eq!(nav.catchup_past, Some(true));
}

/// Channel up/down move a page at a time, clamp at the day's edge, and only
/// cross the day boundary from the edge row.
#[test]
fn page_movement_clamps_before_crossing_days() {
    let mut list = DayListController::new(catchup_tuning());
    let mut nav = FakeNavigator::new(3, 3);
    let mut source = CaptureDaySource::default();
    let mut surface = FakeListSurface::default();
    let now = 10 * ONE_DAY_MS;

    list.initialise(ServiceId(1), now);
    list.set_visible_rows(2);
    list.load_day_data(false, false, now, &mut source);
    let events: Vec<Event> = (0..5)
        .map(|i| {
            event(
                1,
                i,
                now + i64::from(i) * 1000 + 1000,
                now + i64::from(i) * 1000 + 2000,
            )
        })
        .collect();
    list.on_day_data(source.batch_for(0, events), now, &mut surface);
    assert_eq!(surface.selected, Some(0));

    let _ = list.handle_key(
        KeyInput::press(Key::ChannelDown),
        now,
        &mut nav,
        &mut source,
        &mut surface,
    );
    assert_eq!(surface.selected, Some(2));
    let _ = list.handle_key(
        KeyInput::press(Key::ChannelDown),
        now,
        &mut nav,
        &mut source,
        &mut surface,
    );
    assert_eq!(surface.selected, Some(4), "clamped at the last row");
    assert_eq!(list.day_offset(), 0);

    let _ = list.handle_key(
        KeyInput::press(Key::ChannelDown),
        now,
        &mut nav,
        &mut source,
        &mut surface,
    );
    assert_eq!(list.day_offset(), 1, "edge row crosses the boundary");
}

/// Preview mode suppresses the navigation arrows entirely.
#[test]
fn preview_mode_suppresses_arrows() {
    let mut list = DayListController::new(catchup_tuning());
    let mut source = CaptureDaySource::default();
    let mut surface = FakeListSurface::default();
    let now = 10 * ONE_DAY_MS;

    list.initialise(ServiceId(1), now);
    list.set_preview(true);
    list.load_day_data(false, false, now, &mut source);
    list.on_day_data(source.batch_for(0, day0_events(now)), now, &mut surface);
    assert!(!surface.up_arrow);
    assert!(!surface.down_arrow);

    list.set_preview(false);
    list.update_control_buttons(now, &mut surface);
    assert!(surface.up_arrow, "previous day reachable with catch-up");
    assert!(surface.down_arrow);
}

/// The auto-refresh timer refetches the displayed day.
#[test]
fn auto_refresh_refetches_current_day() {
    let mut list = DayListController::new(test_tuning(200, 5));
    let mut source = CaptureDaySource::default();
    let now = 10 * ONE_DAY_MS;

    list.initialise(ServiceId(1), now);
    list.load_day_data(false, false, now, &mut source);
    assert_eq!(source.queries.len(), 1);

    list.poll_timers(now + 59_000, &mut source);
    assert_eq!(source.queries.len(), 1);
    list.poll_timers(now + 60_000, &mut source);
    assert_eq!(source.queries.len(), 2);
    assert_eq!(source.queries[1].day_offset, 0);
}
