use chrono::{TimeZone, Utc};
use sparqline::datatype::{normalize_bare_year, parse_instant, Precision};

#[test]
fn bare_year_is_first_of_january() {
    assert_eq!(normalize_bare_year("1987"), "1987-01-01");
    assert_eq!(normalize_bare_year("1987-05"), "1987-05");
    assert_eq!(normalize_bare_year("19870"), "19870");
    assert_eq!(normalize_bare_year(" 1987"), " 1987");

    let moment = parse_instant(&normalize_bare_year("1987")).unwrap();
    assert_eq!(moment.instant, Utc.with_ymd_and_hms(1987, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(moment.precision, Precision::Date);
    assert_eq!(parse_instant("1987").unwrap().precision, Precision::Year);
}

#[test]
fn iso_forms() {
    let expected = Utc.with_ymd_and_hms(1972, 10, 18, 0, 0, 0).unwrap();
    assert_eq!(parse_instant("1972-10-18T00:00:00Z").unwrap().instant, expected);
    assert_eq!(parse_instant("1972-10-18").unwrap().instant, expected);
    assert_eq!(parse_instant("1972-10-18T00:00").unwrap().instant, expected);
    assert_eq!(parse_instant("1972-10-18T02:00:00+02:00").unwrap().instant, expected);
    assert_eq!(parse_instant("  1972-10-18T00:00:00Z\n").unwrap().instant, expected);

    let month = parse_instant("1972-10").unwrap();
    assert_eq!(month.instant, Utc.with_ymd_and_hms(1972, 10, 1, 0, 0, 0).unwrap());
    assert_eq!(month.precision, Precision::YearMonth);

    let fraction = parse_instant("1972-10-18T00:00:00.5Z").unwrap();
    assert_eq!(fraction.instant.timestamp_subsec_millis(), 500);
    assert_eq!(fraction.precision, Precision::DateTime);
}

#[test]
fn signed_years() {
    let bce = parse_instant("-0500-01-01T00:00:00Z").unwrap();
    assert_eq!(bce.instant, Utc.with_ymd_and_hms(-500, 1, 1, 0, 0, 0).unwrap());
    let expanded = parse_instant("+001987-01-01").unwrap();
    assert_eq!(expanded.instant, Utc.with_ymd_and_hms(1987, 1, 1, 0, 0, 0).unwrap());
}

#[test]
fn rfc2822_fallback() {
    let moment = parse_instant("Wed, 18 Oct 1972 00:00:00 +0000").unwrap();
    assert_eq!(moment.instant, Utc.with_ymd_and_hms(1972, 10, 18, 0, 0, 0).unwrap());
}

#[test]
fn rejects_non_instants() {
    for raw in ["", "   ", "unknown", "1987-13-01", "1987-02-30", "1987-01-01T25:00:00Z", "87", "1987-01-01T00:00:00+24:00"] {
        assert!(parse_instant(raw).is_none(), "{raw:?} should not parse");
    }
}

#[test]
fn dates_may_carry_an_offset() {
    let utc = parse_instant("1992-09-10Z").unwrap();
    assert_eq!(utc.instant, Utc.with_ymd_and_hms(1992, 9, 10, 0, 0, 0).unwrap());
    assert_eq!(utc.precision, Precision::Date);
    let ahead = parse_instant("1992-09-10+02:00").unwrap();
    assert_eq!(ahead.instant, Utc.with_ymd_and_hms(1992, 9, 9, 22, 0, 0).unwrap());
    assert_eq!(ahead.precision, Precision::Date);
    let behind = parse_instant("1992-09-10-05:00").unwrap();
    assert_eq!(behind.instant, Utc.with_ymd_and_hms(1992, 9, 10, 5, 0, 0).unwrap());
}

#[test]
fn long_fractions_are_truncated() {
    let moment = parse_instant("1992-09-10T10:00:00.123456789012Z").unwrap();
    assert_eq!(moment.instant.timestamp_subsec_nanos(), 123_456_789);
    assert_eq!(moment.instant, Utc.with_ymd_and_hms(1992, 9, 10, 10, 0, 0).unwrap() + chrono::Duration::nanoseconds(123_456_789));
}
