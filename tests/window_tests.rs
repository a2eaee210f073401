use chrono::{Days, TimeZone, Utc};
use chrono_tz::Tz;
use search_pulse::window::compute_window;

#[test]
fn test_window_spans_exactly_28_days() {
    let zones = [
        "UTC",
        "America/Los_Angeles",
        "America/Argentina/Buenos_Aires",
        "Asia/Tokyo",
        "Australia/Sydney",
    ];
    let instants = [
        Utc.with_ymd_and_hms(2026, 8, 27, 6, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 30, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 9, 2, 30, 0).unwrap(),
    ];

    for zone in zones {
        let tz: Tz = zone.parse().unwrap();
        for now in instants {
            let window = compute_window(now, tz);
            assert_eq!(
                window.start_date + Days::new(28),
                window.end_date,
                "window for {zone} at {now} should span 28 days"
            );
        }
    }
}

#[test]
fn test_window_ends_before_local_midnight() {
    let zones = ["UTC", "America/Los_Angeles", "Asia/Tokyo"];
    let instants = [
        Utc.with_ymd_and_hms(2026, 8, 27, 6, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 30, 0).unwrap(),
    ];

    for zone in zones {
        let tz: Tz = zone.parse().unwrap();
        for now in instants {
            let window = compute_window(now, tz);
            let local_today = now.with_timezone(&tz).date_naive();
            assert!(
                window.end_date < local_today,
                "end date {} should precede local today {local_today} in {zone}",
                window.end_date
            );
        }
    }
}

#[test]
fn test_today_truncates_in_target_zone_not_utc() {
    // 01:00 UTC on Aug 27: already the 27th in Tokyo, still the 26th in LA
    let now = Utc.with_ymd_and_hms(2026, 8, 27, 1, 0, 0).unwrap();

    let tokyo = compute_window(now, "Asia/Tokyo".parse().unwrap());
    assert_eq!(tokyo.end_date.to_string(), "2026-08-26");

    let la = compute_window(now, "America/Los_Angeles".parse().unwrap());
    assert_eq!(la.end_date.to_string(), "2026-08-25");
}

#[test]
fn test_weekday_label_is_pluralized_name_of_yesterday() {
    // Aug 27 2026 is a Thursday, so yesterday is a Wednesday
    let now = Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap();
    let window = compute_window(now, "UTC".parse().unwrap());
    assert_eq!(window.weekday_label, "Wednesdays");

    // In LA it is still Aug 26, so yesterday is Tuesday Aug 25
    let now = Utc.with_ymd_and_hms(2026, 8, 27, 1, 0, 0).unwrap();
    let window = compute_window(now, "America/Los_Angeles".parse().unwrap());
    assert_eq!(window.weekday_label, "Tuesdays");
}

#[test]
fn test_compute_window_is_deterministic() {
    let now = Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap();
    let tz: Tz = "Australia/Sydney".parse().unwrap();
    assert_eq!(compute_window(now, tz), compute_window(now, tz));
}
