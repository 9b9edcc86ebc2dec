use chrono::{DateTime, Duration, Local, NaiveDate, SubsecRound, Utc};
use now::DateTimeNow;

/// The wire representation of every moment: ISO-8601 in UTC with millisecond precision.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Moments entering the model are cut to milliseconds so that they survive a trip through
/// [ISO_FORMAT] unchanged.
pub fn to_millis(date: DateTime<Utc>) -> DateTime<Utc> {
    date.trunc_subsecs(3)
}

pub fn to_iso_string(date: DateTime<Utc>) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Start of the local day containing `date`, as a UTC moment.
pub fn local_day_start(date: DateTime<Local>) -> DateTime<Utc> {
    to_millis(date.beginning_of_day().with_timezone(&Utc))
}

/// Whole days from `today` until `date`. Negative once `date` has passed.
pub fn days_between(today: NaiveDate, date: NaiveDate) -> i64 {
    (date - today).num_days()
}

pub fn format_duration(v: Duration) -> String {
    if v.num_hours() > 0 {
        format!(
            "{}h{}m{}s",
            v.num_hours(),
            v.num_minutes() % 60,
            v.num_seconds() % 60
        )
    } else if v.num_minutes() > 0 {
        format!("{}m{}s", v.num_minutes() % 60, v.num_seconds() % 60)
    } else {
        format!("{}s", v.num_seconds() % 60)
    }
}
