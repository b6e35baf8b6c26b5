//! Split boundary computation.
//!
//! Turns a total duration and a [`SplitPolicy`] into the concrete
//! [`TimeRange`]s handed to the media backend. Out-of-bounds custom ranges
//! are clamped and every clamp is reported as an [`Advisory`].

use std::fmt;
use std::str::FromStr;

use crate::error::TrimError;

/// Ceiling of a percentage range before conversion to seconds.
pub const PERCENT_CEILING: f64 = 100.0;

/// Unit a custom range is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Seconds,
    Minutes,
    Percentage,
}

impl Unit {
    /// Largest value a range end may take, in this unit.
    pub fn limit(self, duration: f64) -> f64 {
        match self {
            Unit::Seconds => duration,
            Unit::Minutes => duration / 60.0,
            Unit::Percentage => PERCENT_CEILING,
        }
    }

    pub fn to_seconds(self, value: f64, duration: f64) -> f64 {
        match self {
            Unit::Seconds => value,
            Unit::Minutes => value * 60.0,
            Unit::Percentage => value / PERCENT_CEILING * duration,
        }
    }

    pub fn from_seconds(self, seconds: f64, duration: f64) -> f64 {
        match self {
            Unit::Seconds => seconds,
            Unit::Minutes => seconds / 60.0,
            Unit::Percentage => seconds / duration * PERCENT_CEILING,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Unit::Seconds => "secs",
            Unit::Minutes => "mins",
            Unit::Percentage => "%",
        };
        f.write_str(name)
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "secs" | "sec" | "seconds" | "s" => Ok(Unit::Seconds),
            "mins" | "min" | "minutes" | "m" => Ok(Unit::Minutes),
            "percentage" | "percent" | "pct" | "%" => Ok(Unit::Percentage),
            other => Err(format!(
                "unknown unit '{other}', expected one of: secs, mins, percentage"
            )),
        }
    }
}

/// A sub-range of the source, in seconds.
///
/// Always satisfies `0 <= start < end <= duration` for the duration it was
/// built against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    start: f64,
    end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64, duration: f64) -> Option<Self> {
        if 0.0 <= start && start < end && end <= duration {
            Some(TimeRange { start, end })
        } else {
            None
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}s..{:.2}s", self.start, self.end)
    }
}

/// Notice that an input was moved to the nearest valid boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advisory {
    EndClamped { requested: f64, limit: f64, unit: Unit },
    StartClamped { requested: f64, unit: Unit },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Advisory::EndClamped {
                limit,
                unit: Unit::Percentage,
                ..
            } => write!(
                f,
                "Video doesn't have additional frames to process. It'll max out at {limit}%."
            ),
            Advisory::EndClamped {
                requested,
                limit,
                unit,
            } => write!(
                f,
                "Video doesn't have additional {:.2} {unit} to process. It'll max out at {:.2} {unit}.",
                requested - limit,
                limit
            ),
            Advisory::StartClamped { requested, unit } => write!(
                f,
                "Start time should be equal or greater than 0, got {requested}. Choosing default start time 0 {unit}."
            ),
        }
    }
}

/// A custom range after clamping, with the notices the clamping produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Clamped {
    pub range: TimeRange,
    pub advisories: Vec<Advisory>,
}

/// Ranges computed for a [`SplitPolicy`].
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub ranges: Vec<TimeRange>,
    pub advisories: Vec<Advisory>,
}

/// How a source is partitioned into output ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitPolicy {
    EqualParts { count: u32 },
    Range { start: f64, end: f64, unit: Unit },
}

impl SplitPolicy {
    pub fn ranges(&self, duration: f64) -> Result<Plan, TrimError> {
        match *self {
            SplitPolicy::EqualParts { count } => Ok(Plan {
                ranges: compute_equal_parts(duration, count)?,
                advisories: Vec::new(),
            }),
            SplitPolicy::Range { start, end, unit } => {
                let Clamped { range, advisories } =
                    compute_custom_range(duration, start, end, unit)?;
                Ok(Plan {
                    ranges: vec![range],
                    advisories,
                })
            }
        }
    }
}

fn check_duration(duration: f64) -> Result<(), TrimError> {
    if duration.is_finite() && duration > 0.0 {
        Ok(())
    } else {
        Err(TrimError::invalid_argument(format!(
            "video duration must be positive, got {duration}"
        )))
    }
}

/// Splits `[0, duration]` into `count` contiguous ranges of equal length.
///
/// Boundaries are computed as `i * duration / count` and the final end is
/// pinned to `duration`, so no error accumulates across parts.
pub fn compute_equal_parts(duration: f64, count: u32) -> Result<Vec<TimeRange>, TrimError> {
    check_duration(duration)?;
    if count < 1 {
        return Err(TrimError::invalid_argument(
            "number of parts must be at least 1",
        ));
    }

    let parts = f64::from(count);
    let boundary = |i: u32| {
        if i == count {
            duration
        } else {
            f64::from(i) * duration / parts
        }
    };

    (0..count)
        .map(|i| {
            TimeRange::new(boundary(i), boundary(i + 1), duration).ok_or_else(|| {
                TrimError::invalid_argument(format!(
                    "a {duration}s video is too short to split into {count} parts"
                ))
            })
        })
        .collect()
}

/// Resolves a user-supplied range in `unit` to seconds.
///
/// `end < start` is rejected outright. Otherwise an end at or past the
/// unit's limit is pulled back to the limit and a negative start is raised to
/// zero, each with an [`Advisory`].
pub fn compute_custom_range(
    duration: f64,
    start: f64,
    end: f64,
    unit: Unit,
) -> Result<Clamped, TrimError> {
    check_duration(duration)?;
    if !start.is_finite() || !end.is_finite() {
        return Err(TrimError::invalid_argument(format!(
            "start and end must be finite numbers, got {start} and {end}"
        )));
    }
    if end < start {
        return Err(TrimError::InvalidRange { start, unit });
    }

    let limit = unit.limit(duration);
    let mut advisories = Vec::new();

    let end_seconds = if end >= limit {
        if end > limit {
            advisories.push(Advisory::EndClamped {
                requested: end,
                limit,
                unit,
            });
        }
        duration
    } else {
        unit.to_seconds(end, duration)
    };

    let start_seconds = if start < 0.0 {
        advisories.push(Advisory::StartClamped {
            requested: start,
            unit,
        });
        0.0
    } else {
        unit.to_seconds(start, duration)
    };

    let range = TimeRange::new(start_seconds, end_seconds, duration)
        .ok_or(TrimError::InvalidRange { start, unit })?;
    Ok(Clamped { range, advisories })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_covers(ranges: &[TimeRange], duration: f64) {
        assert_eq!(ranges.first().map(TimeRange::start), Some(0.0));
        assert_eq!(ranges.last().map(TimeRange::end), Some(duration));
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
    }

    #[test]
    fn test_equal_parts_cover_duration() {
        for &(duration, count) in &[(1.0, 1), (10.0, 3), (0.7, 7), (3601.33, 17), (59.94, 1000)] {
            let ranges = compute_equal_parts(duration, count).unwrap();
            assert_eq!(ranges.len(), count as usize);
            assert_covers(&ranges, duration);
            let expected = duration / f64::from(count);
            for range in &ranges {
                assert!((range.length() - expected).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn test_equal_parts_twenty_four_of_five_seconds() {
        let ranges = compute_equal_parts(120.0, 24).unwrap();
        assert_eq!(ranges.len(), 24);
        assert_covers(&ranges, 120.0);
        for (i, range) in ranges.iter().enumerate() {
            assert!((range.start() - 5.0 * i as f64).abs() < EPSILON);
            assert!((range.length() - 5.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_equal_parts_rejects_bad_input() {
        assert!(matches!(
            compute_equal_parts(120.0, 0),
            Err(TrimError::InvalidArgument(_))
        ));
        assert!(matches!(
            compute_equal_parts(0.0, 4),
            Err(TrimError::InvalidArgument(_))
        ));
        assert!(matches!(
            compute_equal_parts(f64::NAN, 4),
            Err(TrimError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_custom_range_in_bounds_is_unchanged() {
        for &(start, end) in &[(0.0, 60.0), (10.0, 20.0), (59.5, 60.0), (0.0, 0.25)] {
            let clamped = compute_custom_range(60.0, start, end, Unit::Seconds).unwrap();
            assert_eq!(clamped.range.start(), start);
            assert_eq!(clamped.range.end(), end);
            assert!(clamped.advisories.is_empty());
        }
    }

    #[test]
    fn test_custom_range_clamps_negative_start() {
        let clamped = compute_custom_range(100.0, -5.0, 50.0, Unit::Seconds).unwrap();
        assert_eq!(clamped.range, TimeRange::new(0.0, 50.0, 100.0).unwrap());
        assert_eq!(
            clamped.advisories,
            vec![Advisory::StartClamped {
                requested: -5.0,
                unit: Unit::Seconds
            }]
        );
    }

    #[test]
    fn test_custom_range_clamps_end_past_duration() {
        let clamped = compute_custom_range(60.0, 10.0, 90.0, Unit::Seconds).unwrap();
        assert_eq!(clamped.range, TimeRange::new(10.0, 60.0, 60.0).unwrap());
        assert_eq!(clamped.advisories.len(), 1);
        assert_eq!(
            clamped.advisories[0].to_string(),
            "Video doesn't have additional 30.00 secs to process. It'll max out at 60.00 secs."
        );
    }

    #[test]
    fn test_custom_range_end_before_start() {
        match compute_custom_range(60.0, 40.0, 10.0, Unit::Seconds) {
            Err(TrimError::InvalidRange { start, unit }) => {
                assert_eq!(start, 40.0);
                assert_eq!(unit, Unit::Seconds);
            }
            other => panic!("expected InvalidRange, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_range_empty_after_clamping() {
        assert!(matches!(
            compute_custom_range(60.0, 10.0, 10.0, Unit::Seconds),
            Err(TrimError::InvalidRange { .. })
        ));
        // Start lies beyond the clamped end.
        assert!(matches!(
            compute_custom_range(60.0, 70.0, 90.0, Unit::Seconds),
            Err(TrimError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_custom_range_percentage_ceiling() {
        let clamped = compute_custom_range(200.0, 0.0, 150.0, Unit::Percentage).unwrap();
        assert_eq!(clamped.range, TimeRange::new(0.0, 200.0, 200.0).unwrap());
        assert_eq!(
            clamped.advisories,
            vec![Advisory::EndClamped {
                requested: 150.0,
                limit: 100.0,
                unit: Unit::Percentage
            }]
        );
        assert_eq!(
            clamped.advisories[0].to_string(),
            "Video doesn't have additional frames to process. It'll max out at 100%."
        );
    }

    #[test]
    fn test_custom_range_percentage_converts() {
        let clamped = compute_custom_range(200.0, 25.0, 50.0, Unit::Percentage).unwrap();
        assert_eq!(clamped.range.start(), 50.0);
        assert_eq!(clamped.range.end(), 100.0);
        assert!(clamped.advisories.is_empty());
    }

    #[test]
    fn test_custom_range_minutes() {
        let clamped = compute_custom_range(600.0, 1.0, 2.5, Unit::Minutes).unwrap();
        assert_eq!(clamped.range.start(), 60.0);
        assert_eq!(clamped.range.end(), 150.0);

        // 100s is 1.67 minutes; asking for 3 pins the end to the exact duration.
        let clamped = compute_custom_range(100.0, 0.5, 3.0, Unit::Minutes).unwrap();
        assert_eq!(clamped.range.start(), 30.0);
        assert_eq!(clamped.range.end(), 100.0);
        assert_eq!(clamped.advisories.len(), 1);
    }

    #[test]
    fn test_custom_range_both_clamps() {
        let clamped = compute_custom_range(60.0, -1.0, 61.0, Unit::Seconds).unwrap();
        assert_eq!(clamped.range, TimeRange::new(0.0, 60.0, 60.0).unwrap());
        assert_eq!(clamped.advisories.len(), 2);
    }

    #[test]
    fn test_split_policy_dispatch() {
        let plan = SplitPolicy::EqualParts { count: 4 }.ranges(8.0).unwrap();
        assert_eq!(plan.ranges.len(), 4);
        assert!(plan.advisories.is_empty());

        let plan = SplitPolicy::Range {
            start: 1.0,
            end: 20.0,
            unit: Unit::Seconds,
        }
        .ranges(8.0)
        .unwrap();
        assert_eq!(plan.ranges, vec![TimeRange::new(1.0, 8.0, 8.0).unwrap()]);
        assert_eq!(plan.advisories.len(), 1);
    }

    #[test]
    fn test_unit_from_seconds() {
        assert_eq!(Unit::Seconds.from_seconds(90.0, 600.0), 90.0);
        assert_eq!(Unit::Minutes.from_seconds(90.0, 600.0), 1.5);
        assert_eq!(Unit::Percentage.from_seconds(150.0, 600.0), 25.0);
        for unit in [Unit::Seconds, Unit::Minutes, Unit::Percentage] {
            let value = unit.from_seconds(unit.to_seconds(12.0, 600.0), 600.0);
            assert!((value - 12.0).abs() < 1e-9, "{unit}: {value}");
        }
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!("secs".parse::<Unit>(), Ok(Unit::Seconds));
        assert_eq!("Minutes".parse::<Unit>(), Ok(Unit::Minutes));
        assert_eq!("percentage".parse::<Unit>(), Ok(Unit::Percentage));
        assert!("hours".parse::<Unit>().is_err());
    }
}
