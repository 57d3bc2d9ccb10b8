use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::ops::Sub;

/// A non-negative length of time with second precision.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)] // care the ordering of the variants is important
pub enum Duration {
    Length(u64), // in seconds
    Infinity,    // always longer than all other Durations
}

impl Duration {
    pub const ZERO: Duration = Duration::Length(0);

    /// "hh:mm" or "hh:mm:ss"
    pub fn new(string: &str) -> Result<Duration, String> {
        let splitted: Vec<&str> = string.split(':').collect();
        if splitted.len() < 2 || splitted.len() > 3 {
            return Err(format!("wrong duration format: {}", string));
        }
        let hours: u64 = splitted[0]
            .trim()
            .parse()
            .map_err(|_| format!("invalid hours in duration: {}", string))?;
        let minutes: u64 = splitted[1]
            .trim()
            .parse()
            .map_err(|_| format!("invalid minutes in duration: {}", string))?;
        let seconds: u64 = if splitted.len() == 3 {
            splitted[2]
                .trim()
                .parse()
                .map_err(|_| format!("invalid seconds in duration: {}", string))?
        } else {
            0
        };
        if minutes >= 60 || seconds >= 60 {
            return Err(format!("wrong duration format: {}", string));
        }
        Ok(Duration::Length(hours * 3600 + minutes * 60 + seconds))
    }

    pub fn from_seconds(seconds: u64) -> Duration {
        Duration::Length(seconds)
    }

    /// Rounded to whole seconds.
    pub fn from_hours(hours: f64) -> Duration {
        assert!(hours >= 0.0, "cannot create a negative duration");
        Duration::Length((hours * 3600.0).round() as u64)
    }

    pub fn in_sec(&self) -> u64 {
        match self {
            Duration::Infinity => panic!("cannot get seconds of Duration::Infinity."),
            Duration::Length(s) => *s,
        }
    }

    pub fn in_min(&self) -> u64 {
        self.in_sec() / 60
    }

    pub fn in_hours(&self) -> f64 {
        self.in_sec() as f64 / 3600.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Duration::ZERO
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        match (self, other) {
            (Duration::Length(a), Duration::Length(b)) => Duration::Length(a + b),
            _ => Duration::Infinity,
        }
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        assert!(
            self >= other,
            "cannot subtract a longer duration ({}) from a shorter duration ({}).",
            other,
            self
        );
        match (self, other) {
            (Duration::Length(a), Duration::Length(b)) => Duration::Length(a - b),
            (Duration::Infinity, Duration::Length(_)) => Duration::Infinity,
            _ => panic!("cannot subtract Infinity"),
        }
    }
}

impl Sum for Duration {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = Self>,
    {
        iter.fold(Duration::ZERO, |a, b| a + b)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Duration::Length(s) => {
                let hours = s / 3600;
                let minutes = s % 3600 / 60;
                let seconds = s % 60;
                if seconds > 0 {
                    write!(f, "{:02}:{:02}:{:02}h", hours, minutes, seconds)
                } else {
                    write!(f, "{:02}:{:02}h", hours, minutes)
                }
            }
            Duration::Infinity => write!(f, "Inf"),
        }
    }
}
