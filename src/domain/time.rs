use std::{
    fmt,
    ops::{Add, Neg, Sub},
    str::FromStr,
};

use crate::core::errors::{FieldServiceError, Result};

const MINUTES_PER_HOUR: i64 = 60;

/// Signed quantity of hours and minutes, stored as a single signed minute count.
///
/// Accessors always report the magnitude; the sign is only exposed through
/// [`Time::is_negative`]. Positive and negative zero are the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    total: i64,
}

impl Time {
    pub const EMPTY: Time = Time { total: 0 };

    /// Builds a duration from non-negative components and a sign flag.
    pub fn new(hours: i64, minutes: i64, is_negative: bool) -> Result<Self> {
        if hours < 0 {
            return Err(FieldServiceError::InvalidArgument(format!(
                "hours must not be negative (got {hours})"
            )));
        }
        if !(0..MINUTES_PER_HOUR).contains(&minutes) {
            return Err(FieldServiceError::InvalidArgument(format!(
                "minutes must be within 0..=59 (got {minutes})"
            )));
        }
        let magnitude = hours
            .checked_mul(MINUTES_PER_HOUR)
            .and_then(|total| total.checked_add(minutes))
            .ok_or_else(|| {
                FieldServiceError::InvalidArgument(format!("{hours} hours is out of range"))
            })?;
        Ok(Self {
            total: if is_negative { -magnitude } else { magnitude },
        })
    }

    /// Positive duration shorthand for [`Time::new`].
    pub fn positive(hours: i64, minutes: i64) -> Result<Self> {
        Self::new(hours, minutes, false)
    }

    pub fn from_total_minutes(total: i64) -> Self {
        Self { total }
    }

    pub fn total_minutes(&self) -> i64 {
        self.total
    }

    pub fn hours(&self) -> i64 {
        (self.total.unsigned_abs() / MINUTES_PER_HOUR as u64) as i64
    }

    pub fn minutes(&self) -> i64 {
        (self.total.unsigned_abs() % MINUTES_PER_HOUR as u64) as i64
    }

    pub fn is_negative(&self) -> bool {
        self.total < 0
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn plus(self, other: Time) -> Time {
        Time::from_total_minutes(self.total.saturating_add(other.total))
    }

    pub fn minus(self, other: Time) -> Time {
        Time::from_total_minutes(self.total.saturating_sub(other.total))
    }

    /// Returns only the sub-hour remainder as a positive duration.
    pub fn remainder(&self) -> Time {
        Time::from_total_minutes(self.minutes())
    }
}

impl Add for Time {
    type Output = Time;

    fn add(self, rhs: Time) -> Time {
        self.plus(rhs)
    }
}

impl Sub for Time {
    type Output = Time;

    fn sub(self, rhs: Time) -> Time {
        self.minus(rhs)
    }
}

impl Neg for Time {
    type Output = Time;

    fn neg(self) -> Time {
        Time::from_total_minutes(self.total.saturating_neg())
    }
}

impl std::iter::Sum for Time {
    fn sum<I: Iterator<Item = Time>>(iter: I) -> Time {
        iter.fold(Time::EMPTY, Time::plus)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{}{}:{:02}", sign, self.hours(), self.minutes())
    }
}

impl FromStr for Time {
    type Err = FieldServiceError;

    /// Parses `h:mm`, `-h:mm`, or a bare hour count.
    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let invalid = || FieldServiceError::InvalidInput(format!("`{input}` is not a duration"));
        let (hours, minutes) = match body.split_once(':') {
            Some((h, m)) => (
                h.parse::<i64>().map_err(|_| invalid())?,
                m.parse::<i64>().map_err(|_| invalid())?,
            ),
            None => (body.parse::<i64>().map_err(|_| invalid())?, 0),
        };
        Time::new(hours, minutes, negative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_components() {
        assert!(Time::new(-1, 0, false).is_err());
        assert!(Time::new(0, -1, false).is_err());
        assert!(Time::new(0, 60, false).is_err());
        assert!(Time::new(0, 59, false).is_ok());
    }

    #[test]
    fn addition_carries_minutes_into_hours() {
        let sum = Time::positive(1, 45).unwrap() + Time::positive(2, 30).unwrap();
        assert_eq!(sum.hours(), 4);
        assert_eq!(sum.minutes(), 15);
        assert!(!sum.is_negative());
    }

    #[test]
    fn negation_cancels_out() {
        let time = Time::positive(3, 20).unwrap();
        assert_eq!(time + (-time), Time::EMPTY);
        assert!((time + (-time)).is_empty());
    }

    #[test]
    fn negative_zero_equals_empty() {
        assert_eq!(Time::new(0, 0, true).unwrap(), Time::EMPTY);
        assert!(!Time::new(0, 0, true).unwrap().is_negative());
    }

    #[test]
    fn negative_values_report_magnitude() {
        let time = Time::new(1, 50, true).unwrap();
        assert_eq!(time.hours(), 1);
        assert_eq!(time.minutes(), 50);
        assert!(time.is_negative());
        assert_eq!(time.total_minutes(), -110);
    }

    #[test]
    fn ordering_follows_signed_minutes() {
        let negative = Time::new(1, 50, true).unwrap();
        let positive = Time::new(1, 50, false).unwrap();
        assert!(negative < positive);
        assert!(positive > negative);
    }

    #[test]
    fn subtraction_can_go_negative() {
        let result = Time::positive(0, 30).unwrap() - Time::positive(1, 0).unwrap();
        assert!(result.is_negative());
        assert_eq!(result.minutes(), 30);
        assert_eq!(result.to_string(), "-0:30");
    }

    #[test]
    fn parses_hour_minute_notation() {
        assert_eq!("2:05".parse::<Time>().unwrap(), Time::positive(2, 5).unwrap());
        assert_eq!("3".parse::<Time>().unwrap(), Time::positive(3, 0).unwrap());
        assert!("1:75".parse::<Time>().is_err());
        assert!("abc".parse::<Time>().is_err());
    }

    #[test]
    fn oversized_hours_are_rejected_instead_of_overflowing() {
        let err = Time::new(200_000_000_000_000_000, 0, false).unwrap_err();
        assert!(matches!(err, FieldServiceError::InvalidArgument(_)));
        assert!("200000000000000000:00".parse::<Time>().is_err());
    }

    #[test]
    fn extreme_values_saturate() {
        let max = Time::from_total_minutes(i64::MAX);
        assert_eq!(max + Time::positive(1, 0).unwrap(), max);
        let min = Time::from_total_minutes(i64::MIN);
        assert_eq!(min.hours(), (i64::MIN.unsigned_abs() / 60) as i64);
        assert!(!(-min).is_negative());
    }
}
