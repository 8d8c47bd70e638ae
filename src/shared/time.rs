use std::{
    fmt::Display,
    ops::{Add, AddAssign, Sub},
};

use chrono::{Local, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

const HOUR_TO_SEC: u32 = 60 * 60;
const MINUTE_TO_SEC: u32 = 60;

/// Time of day stored as seconds since midnight.
///
/// There is no calendar attached. Hours past 23 are allowed and mean the same
/// service day continued after midnight (`25:10` is 01:10 the next morning).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Time(u32);

impl From<u32> for Time {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<NaiveTime> for Time {
    fn from(value: NaiveTime) -> Self {
        Self(value.num_seconds_from_midnight())
    }
}

impl Sub<Time> for Time {
    type Output = Duration;

    /// Callers must make sure `rhs` is not later than `self`,
    /// use [`Time::duration_since`] otherwise.
    fn sub(self, rhs: Self) -> Self::Output {
        Duration(self.0 - rhs.0)
    }
}

impl Add<Duration> for Time {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign<Duration> for Time {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hms_string())
    }
}

impl Time {
    pub fn now() -> Self {
        let now = Local::now();
        Self(now.num_seconds_from_midnight())
    }

    pub const fn from_seconds(secs: u32) -> Self {
        Self(secs)
    }

    pub const fn from_hm(hours: u32, minutes: u32) -> Self {
        Self(hours * HOUR_TO_SEC + minutes * MINUTE_TO_SEC)
    }

    pub const fn as_seconds(&self) -> u32 {
        self.0
    }

    /// Time elapsed since `earlier`, `None` if `earlier` is actually later.
    pub fn duration_since(&self, earlier: Time) -> Option<Duration> {
        self.0.checked_sub(earlier.0).map(Duration)
    }

    pub fn to_hms_string(&self) -> String {
        let h = self.0 / HOUR_TO_SEC;
        let m = (self.0 % HOUR_TO_SEC) / MINUTE_TO_SEC;
        let s = self.0 % MINUTE_TO_SEC;
        format!("{:02}:{:02}:{:02}", h, m, s)
    }

    pub fn to_hm_string(&self) -> String {
        let h = self.0 / HOUR_TO_SEC;
        let m = (self.0 % HOUR_TO_SEC) / MINUTE_TO_SEC;
        format!("{:02}:{:02}", h, m)
    }

    /// Parses `HH:MM` or `HH:MM:SS`.
    pub fn from_hms(time: &str) -> Option<Self> {
        let mut split = time.trim().split(':');
        let hours: u32 = split.next()?.parse().ok()?;
        let minutes: u32 = split.next()?.parse().ok()?;
        if minutes >= 60 {
            return None;
        }
        let seconds: u32 = match split.next() {
            Some(seconds) => seconds.parse().ok()?,
            None => 0,
        };
        if seconds >= 60 || split.next().is_some() {
            return None;
        }
        hours
            .checked_mul(HOUR_TO_SEC)?
            .checked_add(minutes * MINUTE_TO_SEC + seconds)
            .map(Self)
    }
}

/// A span of time in seconds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Duration(u32);

impl From<u32> for Duration {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Duration {
    pub const ZERO: Duration = Duration(0);

    pub const fn from_seconds(secs: u32) -> Self {
        Self(secs)
    }

    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes * MINUTE_TO_SEC)
    }

    pub const fn from_hours(hours: u32) -> Self {
        Self(hours * HOUR_TO_SEC)
    }

    pub const fn as_seconds(&self) -> u32 {
        self.0
    }

    /// Whole minutes, rounded down.
    pub const fn as_minutes(&self) -> u32 {
        self.0 / MINUTE_TO_SEC
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

impl Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let minutes = self.as_minutes();
        let seconds = self.0 % MINUTE_TO_SEC;
        if seconds == 0 {
            write!(f, "{minutes} min")
        } else {
            write!(f, "{minutes} min {seconds} s")
        }
    }
}

#[test]
fn parse_unparse_hms() {
    let time = "12:30:30";
    let stime = Time::from_hms(time).unwrap();
    assert_eq!(time, stime.to_hms_string())
}

#[test]
fn parse_hm() {
    let time = Time::from_hms("06:05").unwrap();
    assert_eq!(time, Time::from_hm(6, 5));
    assert_eq!(time.to_hm_string(), "06:05");
}

#[test]
fn parse_past_midnight() {
    let time = Time::from_hms("25:10").unwrap();
    assert_eq!(time.as_seconds(), 25 * 3600 + 600);
}

#[test]
fn invalid_minutes() {
    assert!(Time::from_hms("06:75").is_none())
}

#[test]
fn hours_overflow() {
    assert!(Time::from_hms("1200000:00").is_none());
    assert!(Time::from_hms("1193046:28:16").is_none());
}

#[test]
fn too_many_parts() {
    assert!(Time::from_hms("06:00:00:00").is_none())
}

#[test]
fn duration_since_earlier() {
    let a = Time::from_hm(6, 0);
    let b = Time::from_hm(6, 10);
    assert_eq!(b.duration_since(a), Some(Duration::from_minutes(10)));
    assert_eq!(a.duration_since(b), None);
}

#[test]
fn from_naive_time() {
    let naive = NaiveTime::from_hms_opt(6, 2, 0).unwrap();
    assert_eq!(Time::from(naive), Time::from_hm(6, 2));
}

#[test]
fn duration_display() {
    assert_eq!(Duration::from_minutes(8).to_string(), "8 min");
    assert_eq!(Duration::from_seconds(90).to_string(), "1 min 30 s");
}
