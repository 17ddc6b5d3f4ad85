use chrono::{Duration, NaiveDate};
use searchlens::chat::router::dates;
use searchlens::models::{latest_final_date, DateRange};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 5).expect("valid date")
}

fn lag_boundary() -> NaiveDate {
    // 2025-08-03: two days before the fixed "today".
    latest_final_date(today())
}

#[test]
fn last_months_spanish_pattern() {
    let range = dates::resolve("¿Cómo fueron los últimos 3 meses de clicks?", today());
    assert_eq!(range.end, lag_boundary());
    assert_eq!(range.start, lag_boundary() - Duration::days(90));
}

#[test]
fn last_months_without_accent() {
    let range = dates::resolve("dame los ultimos 2 meses", today());
    assert_eq!(range.end, lag_boundary());
    assert_eq!(range.start, lag_boundary() - Duration::days(60));
}

#[test]
fn last_months_english_pattern() {
    let range = dates::resolve("show me the last 4 months of impressions", today());
    assert_eq!(range.end, lag_boundary());
    assert_eq!(range.start, lag_boundary() - Duration::days(120));
}

#[test]
fn month_range_spanish() {
    let range = dates::resolve("datos de enero 2025 a marzo 2025", today());
    assert_eq!(
        range,
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        )
    );
}

#[test]
fn month_range_end_clamped_to_reporting_lag() {
    let range = dates::resolve("de enero 2025 a diciembre 2025", today());
    assert_eq!(range.start, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    assert_eq!(range.end, lag_boundary());
}

#[test]
fn month_range_english() {
    let range = dates::resolve("from january 2025 to february 2025", today());
    assert_eq!(
        range,
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
        )
    );
}

#[test]
fn explicit_iso_range_is_honored() {
    let range = dates::resolve("clicks del 2025-01-05 al 2025-02-10", today());
    assert_eq!(
        range,
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
        )
    );
}

#[test]
fn unparseable_input_degrades_to_six_month_window() {
    let range = dates::resolve("how is my site doing?", today());
    assert_eq!(range.end, lag_boundary());
    assert_eq!(range.start, lag_boundary() - Duration::days(180));
}

#[test]
fn months_pattern_wins_over_month_range() {
    let range = dates::resolve(
        "últimos 3 meses, no de enero 2025 a marzo 2025",
        today(),
    );
    assert_eq!(range.end, lag_boundary());
    assert_eq!(range.start, lag_boundary() - Duration::days(90));
}

#[test]
fn zero_months_falls_back_to_default() {
    let range = dates::resolve("últimos 0 meses", today());
    assert_eq!(range.start, lag_boundary() - Duration::days(180));
}

#[test]
fn inverted_month_range_falls_back_to_default() {
    let range = dates::resolve("de marzo 2025 a enero 2025", today());
    assert_eq!(range.end, lag_boundary());
    assert_eq!(range.start, lag_boundary() - Duration::days(180));
}

#[test]
fn output_always_satisfies_range_invariant() {
    let inputs = [
        "últimos 3 meses",
        "last 12 months",
        "de junio 2025 a agosto 2025",
        "from july 2025 to december 2025",
        "2025-01-01 a 2025-12-31",
        "no dates here at all",
        "últimos 240 meses",
    ];
    for input in inputs {
        let range = dates::resolve(input, today());
        assert!(range.start <= range.end, "inverted range for {input:?}");
        assert!(
            range.end <= lag_boundary(),
            "range for {input:?} exceeds the reporting lag"
        );
    }
}
