// used for the instants that entries are placed at
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
// so the patterns are compiled once
use lazy_static::lazy_static;
use regex::{Captures, Regex};

// used to normalize bare years without copying other values
use std::borrow::Cow;
// used to print out readable forms of a moment
use std::fmt;

lazy_static! {
    static ref BARE_YEAR: Regex = Regex::new(r"^\d{4}$").unwrap();
    static ref ISO_MOMENT: Regex = Regex::new(
        r"(?x)
        ^(?P<year>[+-]\d{4,6}|\d{4})
        (?:-(?P<month>\d{2})
            (?:-(?P<day>\d{2})
                (?:[T\x20](?P<hour>\d{2}):(?P<minute>\d{2})
                    (?::(?P<second>\d{2})(?:[.,](?P<fraction>\d+))?)?
                )?
                (?P<offset>[Zz]|[+-]\d{2}:?\d{2})?
            )?
        )?$"
    )
    .unwrap();
}

/// How much of a moment was actually stated in the source text.
#[derive(Eq, PartialEq, PartialOrd, Ord, Debug, Hash, Clone, Copy)]
pub enum Precision {
    Year,
    YearMonth,
    Date,
    DateTime,
}

/// A resolved point in time together with the precision it was written in.
#[derive(Eq, PartialEq, PartialOrd, Ord, Debug, Hash, Clone, Copy)]
pub struct Moment {
    pub instant: DateTime<Utc>,
    pub precision: Precision,
}

impl Moment {
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }
}
impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.precision {
            Precision::Year => write!(f, "{}", self.instant.format("%Y")),
            Precision::YearMonth => write!(f, "{}", self.instant.format("%Y-%m")),
            Precision::Date => write!(f, "{}", self.instant.format("%Y-%m-%d")),
            Precision::DateTime => write!(f, "{}", self.instant.to_rfc3339()),
        }
    }
}

/// Rewrites a bare four digit year `YYYY` as `YYYY-01-01`; anything else is returned untouched.
pub fn normalize_bare_year(raw: &str) -> Cow<'_, str> {
    if BARE_YEAR.is_match(raw) {
        Cow::Owned(format!("{raw}-01-01"))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Parses a calendar date or date-time into an instant.
///
/// Accepts ISO 8601 style values (`1987`, `1987-09`, `1992-09-10`,
/// `1992-09-10+02:00`, `1972-10-18T00:00:00Z`, `-0500-01-01T00:00:00Z`,
/// optional fraction and offset) with RFC 2822 as a fallback. A date with
/// an offset means midnight at that offset. Values without an offset are
/// read as UTC. Fraction digits beyond nanoseconds are truncated. Returns
/// `None` for anything that does not name a real instant.
pub fn parse_instant(raw: &str) -> Option<Moment> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(captures) = ISO_MOMENT.captures(text) {
        return iso_moment(&captures);
    }
    DateTime::parse_from_rfc2822(text).ok().map(|dt| Moment {
        instant: dt.with_timezone(&Utc),
        precision: Precision::DateTime,
    })
}

fn component(captures: &Captures, name: &str, default: u32) -> Option<u32> {
    match captures.name(name) {
        Some(m) => m.as_str().parse().ok(),
        None => Some(default),
    }
}

fn iso_moment(captures: &Captures) -> Option<Moment> {
    // i32 parsing accepts the leading '+' of expanded years
    let year: i32 = captures["year"].parse().ok()?;
    let month = component(captures, "month", 1)?;
    let day = component(captures, "day", 1)?;
    let hour = component(captures, "hour", 0)?;
    let minute = component(captures, "minute", 0)?;
    let second = component(captures, "second", 0)?;
    let nanos = match captures.name("fraction") {
        // digits past nanoseconds are dropped
        Some(m) => format!("{:0<9}", &m.as_str()[..m.as_str().len().min(9)]).parse().ok()?,
        None => 0,
    };
    let precision = if captures.name("hour").is_some() {
        Precision::DateTime
    } else if captures.name("day").is_some() {
        Precision::Date
    } else if captures.name("month").is_some() {
        Precision::YearMonth
    } else {
        Precision::Year
    };

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_nano_opt(hour, minute, second, nanos)?;
    let offset = match captures.name("offset") {
        Some(m) => offset_seconds(m.as_str())?,
        None => 0,
    };
    let instant = FixedOffset::east_opt(offset)?
        .from_local_datetime(&naive)
        .single()?
        .with_timezone(&Utc);
    Some(Moment { instant, precision })
}

fn offset_seconds(offset: &str) -> Option<i32> {
    if offset.eq_ignore_ascii_case("z") {
        return Some(0);
    }
    let sign = if offset.starts_with('-') { -1 } else { 1 };
    let digits: String = offset[1..].chars().filter(|c| *c != ':').collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4)?.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60))
}
