use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::roll::start_of_hour;

/// How often the leaderboard is wiped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetCadence {
    #[default]
    Daily,
    /// Midnight at the start of Sunday.
    Weekly,
}

impl FromStr for ResetCadence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(ResetCadence::Daily),
            "weekly" => Ok(ResetCadence::Weekly),
            other => Err(format!("unknown reset cadence '{other}', expected daily or weekly")),
        }
    }
}

impl fmt::Display for ResetCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetCadence::Daily => f.write_str("daily"),
            ResetCadence::Weekly => f.write_str("weekly"),
        }
    }
}

/// Time left until the next top of the hour.
pub fn until_next_hour(now: DateTime<Utc>) -> Duration {
    start_of_hour(now) + Duration::hours(1) - now
}

/// The next reset instant strictly after `now`, at local midnight in `timezone`.
pub fn next_reset(now: DateTime<Utc>, timezone: Tz, cadence: ResetCadence) -> DateTime<Utc> {
    let today = now.with_timezone(&timezone).date_naive();
    let days_ahead = match cadence {
        ResetCadence::Daily => 1,
        ResetCadence::Weekly => match today.weekday().num_days_from_sunday() {
            0 => 7,
            n => 7 - n as i64,
        },
    };

    let day = today + Duration::days(days_ahead);
    local_midnight(day, timezone).unwrap_or_else(|| now + Duration::days(days_ahead))
}

/// Start of `day` in `timezone`. Where midnight falls in a DST gap the first
/// valid instant of the day is used instead.
fn local_midnight(day: NaiveDate, timezone: Tz) -> Option<DateTime<Utc>> {
    (0..3).find_map(|hour| {
        let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
        timezone
            .from_local_datetime(&day.and_time(time))
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    })
}

/// Converts a chrono duration into a sleep duration, treating negatives as zero.
pub fn to_std(duration: Duration) -> std::time::Duration {
    duration.to_std().unwrap_or_default()
}
