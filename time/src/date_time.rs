use std::fmt;
use std::ops::Add;
use std::ops::Sub;

use super::Duration;

// Leap years are integrated. No daylight-saving.

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)] // care the ordering of the variants is important
pub enum DateTime {
    Earliest, // always earlier than all TimePoints
    Point(TimePoint),
    Latest, // always later than all TimePoints
}

/// A point in time, stored as seconds since 1970-01-01 00:00:00.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct TimePoint {
    seconds: i64,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DateTime {
    /// "2009-06-15T13:45:13", "2009-06-15 13:45:13" or "2009-6-15T12:10"
    pub fn new(string: &str) -> Result<DateTime, String> {
        let shortened = string.replace('Z', "");
        let splitted: Vec<&str> = shortened.split(&['T', '-', ' ', ':'][..]).collect();
        if splitted.len() < 5 || splitted.len() > 6 {
            return Err(format!("wrong time format: {}", string));
        }
        let fields = parse_fields(&splitted, string)?;
        DateTime::from_fields(fields[0], fields[1], fields[2], fields[3], fields[4], fields[5])
    }

    /// "06-15-2009 13:45:13" (month-day-year, as used by the order interface)
    pub fn from_mdy(string: &str) -> Result<DateTime, String> {
        let splitted: Vec<&str> = string.split(&['T', '-', ' ', ':'][..]).collect();
        if splitted.len() < 5 || splitted.len() > 6 {
            return Err(format!("wrong time format: {}", string));
        }
        let fields = parse_fields(&splitted, string)?;
        DateTime::from_fields(fields[2], fields[0], fields[1], fields[3], fields[4], fields[5])
    }

    pub fn from_fields(
        year: i64,
        month: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
    ) -> Result<DateTime, String> {
        if !(1..=12).contains(&month) {
            return Err(format!("wrong month: {}", month));
        }
        if day < 1 || day > days_of_month(year, month) {
            return Err(format!("wrong day: {}", day));
        }
        if !(0..24).contains(&hour) || !(0..60).contains(&minute) || !(0..60).contains(&second) {
            return Err(format!(
                "wrong time of day: {:02}:{:02}:{:02}",
                hour, minute, second
            ));
        }
        let seconds = days_from_civil(year, month, day) * 86400 + hour * 3600 + minute * 60 + second;
        Ok(DateTime::Point(TimePoint { seconds }))
    }

    pub fn weekday(&self) -> Weekday {
        match self {
            DateTime::Point(t) => {
                let days = t.seconds.div_euclid(86400);
                Weekday::from_index((days + 3).rem_euclid(7) as u8) // 1970-01-01 is a Thursday
            }
            _ => panic!("weekday of {} is undefined.", self),
        }
    }

    pub fn start_of_day(&self) -> DateTime {
        match self {
            DateTime::Point(t) => DateTime::Point(TimePoint {
                seconds: t.seconds.div_euclid(86400) * 86400,
            }),
            _ => *self,
        }
    }

    pub fn add_days(&self, days: u64) -> DateTime {
        *self + Duration::from_seconds(days * 86400)
    }

    /// The time elapsed since the last midnight.
    pub fn time_of_day(&self) -> Duration {
        match self {
            DateTime::Point(t) => Duration::from_seconds(t.seconds.rem_euclid(86400) as u64),
            _ => panic!("time of day of {} is undefined.", self),
        }
    }
}

impl Add<Duration> for DateTime {
    type Output = Self;

    fn add(self, other: Duration) -> Self {
        match other {
            Duration::Infinity => DateTime::Latest, // note that Earliest + Infinity = Latest
            Duration::Length(s) => match self {
                DateTime::Point(t) => DateTime::Point(TimePoint {
                    seconds: t.seconds + s as i64,
                }),
                _ => self,
            },
        }
    }
}

impl Sub<Duration> for DateTime {
    type Output = Self;

    fn sub(self, other: Duration) -> Self {
        match other {
            Duration::Infinity => match self {
                DateTime::Latest => panic!("cannot subtract Infinity from Latest"),
                _ => DateTime::Earliest,
            },
            Duration::Length(s) => match self {
                DateTime::Point(t) => DateTime::Point(TimePoint {
                    seconds: t.seconds - s as i64,
                }),
                _ => self,
            },
        }
    }
}

impl Sub for DateTime {
    type Output = Duration;

    fn sub(self, other: Self) -> Duration {
        assert!(
            other <= self,
            "cannot subtract {} from {}, as it is a later point in time (no negative durations allowed)",
            other,
            self
        );
        match (self, other) {
            (DateTime::Point(t1), DateTime::Point(t2)) => {
                Duration::from_seconds((t1.seconds - t2.seconds) as u64)
            }
            (DateTime::Earliest, DateTime::Earliest) => Duration::ZERO,
            (DateTime::Latest, DateTime::Latest) => Duration::ZERO,
            _ => Duration::Infinity,
        }
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DateTime::Earliest => write!(f, "Earliest"),
            DateTime::Latest => write!(f, "Latest"),
            DateTime::Point(t) => {
                let days = t.seconds.div_euclid(86400);
                let (year, month, day) = civil_from_days(days);
                let rest = t.seconds.rem_euclid(86400);
                write!(
                    f,
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    year,
                    month,
                    day,
                    rest / 3600,
                    rest % 3600 / 60,
                    rest % 60
                )
            }
        }
    }
}

impl Weekday {
    /// Accepts Dutch and English day names, case-insensitive.
    pub fn parse(name: &str) -> Result<Weekday, String> {
        match name.trim().to_lowercase().as_str() {
            "maandag" | "monday" => Ok(Weekday::Monday),
            "dinsdag" | "tuesday" => Ok(Weekday::Tuesday),
            "woensdag" | "wednesday" => Ok(Weekday::Wednesday),
            "donderdag" | "thursday" => Ok(Weekday::Thursday),
            "vrijdag" | "friday" => Ok(Weekday::Friday),
            "zaterdag" | "saturday" => Ok(Weekday::Saturday),
            "zondag" | "sunday" => Ok(Weekday::Sunday),
            _ => Err(format!("unknown day name: {}", name)),
        }
    }

    fn from_index(index: u8) -> Weekday {
        match index {
            0 => Weekday::Monday,
            1 => Weekday::Tuesday,
            2 => Weekday::Wednesday,
            3 => Weekday::Thursday,
            4 => Weekday::Friday,
            5 => Weekday::Saturday,
            6 => Weekday::Sunday,
            _ => panic!("invalid weekday index: {}", index),
        }
    }

    fn index(&self) -> i64 {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
            Weekday::Saturday => 5,
            Weekday::Sunday => 6,
        }
    }

    /// Number of days to wait (0..=6) until the next occurrence of other.
    pub fn days_until(&self, other: Weekday) -> u64 {
        (other.index() - self.index()).rem_euclid(7) as u64
    }
}

fn parse_fields(splitted: &[&str], string: &str) -> Result<[i64; 6], String> {
    let mut fields = [0i64; 6];
    for (i, s) in splitted.iter().enumerate() {
        fields[i] = s
            .trim()
            .parse()
            .map_err(|_| format!("malformed timestamp: {}", string))?;
    }
    Ok(fields)
}

fn days_of_month(year: i64, month: i64) -> i64 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

// Days between 1970-01-01 and the given civil date (Howard Hinnant's algorithm).
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719468
}

fn civil_from_days(z: i64) -> (i64, i64, i64) {
    let z = z + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    (if month <= 2 { y + 1 } else { y }, month, day)
}
