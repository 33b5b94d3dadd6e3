//! Wall-clock timeline calculator.
//!
//! Every segment's real-world start is derived from its clip's modification
//! time (which marks the end of the recording):
//!
//! ```text
//! raw_start = modification_time - clip_duration + segment_start_offset
//! ```
//!
//! An optional adjustment directive then shifts every raw start, either by
//! a list of calendar deltas (`"+1 year -1 month"`) or so that the first
//! clip of the run ends at an absolute date (`"2025-06-01"`). The mode is
//! chosen once from the directive and the shift is the same for every
//! segment of the run.

use std::fmt;

use chrono::{DateTime, Local, Months, NaiveDate, NaiveDateTime, TimeDelta};
use once_cell::sync::OnceCell;

use super::error::{TimelineError, TimelineResult};
use super::timecode::seconds_to_delta;
use crate::models::{SegmentSpec, SourceFile};

/// Calendar unit of a relative delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaUnit {
    Years,
    Quarters,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

impl DeltaUnit {
    /// Parse a unit name (singular, plural or short form).
    ///
    /// Names are case-insensitive except the one-letter `M` (months) and
    /// `m` (minutes).
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "M" {
            return Some(DeltaUnit::Months);
        }
        let unit = match name.to_lowercase().as_str() {
            "y" | "yr" | "yrs" | "year" | "years" => DeltaUnit::Years,
            "q" | "quarter" | "quarters" => DeltaUnit::Quarters,
            "mo" | "mon" | "month" | "months" => DeltaUnit::Months,
            "w" | "wk" | "wks" | "week" | "weeks" => DeltaUnit::Weeks,
            "d" | "day" | "days" => DeltaUnit::Days,
            "h" | "hr" | "hrs" | "hour" | "hours" => DeltaUnit::Hours,
            "m" | "min" | "mins" | "minute" | "minutes" => DeltaUnit::Minutes,
            "s" | "sec" | "secs" | "second" | "seconds" => DeltaUnit::Seconds,
            "ms" | "millisecond" | "milliseconds" => DeltaUnit::Milliseconds,
            _ => return None,
        };
        Some(unit)
    }

    fn name(&self) -> &'static str {
        match self {
            DeltaUnit::Years => "years",
            DeltaUnit::Quarters => "quarters",
            DeltaUnit::Months => "months",
            DeltaUnit::Weeks => "weeks",
            DeltaUnit::Days => "days",
            DeltaUnit::Hours => "hours",
            DeltaUnit::Minutes => "minutes",
            DeltaUnit::Seconds => "seconds",
            DeltaUnit::Milliseconds => "milliseconds",
        }
    }
}

/// A signed amount of one calendar unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDelta {
    pub amount: i64,
    pub unit: DeltaUnit,
}

impl CalendarDelta {
    pub fn new(amount: i64, unit: DeltaUnit) -> Self {
        Self { amount, unit }
    }

    /// Apply the delta with calendar rules.
    ///
    /// Month-based units clamp the day of month (Jan 31 + 1 month = Feb 28/29).
    /// Returns `None` if the result is out of range.
    pub fn apply(&self, instant: NaiveDateTime) -> Option<NaiveDateTime> {
        match self.unit {
            DeltaUnit::Years => add_months(instant, self.amount.checked_mul(12)?),
            DeltaUnit::Quarters => add_months(instant, self.amount.checked_mul(3)?),
            DeltaUnit::Months => add_months(instant, self.amount),
            DeltaUnit::Weeks => instant.checked_add_signed(TimeDelta::try_weeks(self.amount)?),
            DeltaUnit::Days => instant.checked_add_signed(TimeDelta::try_days(self.amount)?),
            DeltaUnit::Hours => instant.checked_add_signed(TimeDelta::try_hours(self.amount)?),
            DeltaUnit::Minutes => instant.checked_add_signed(TimeDelta::try_minutes(self.amount)?),
            DeltaUnit::Seconds => instant.checked_add_signed(TimeDelta::try_seconds(self.amount)?),
            DeltaUnit::Milliseconds => {
                instant.checked_add_signed(TimeDelta::try_milliseconds(self.amount)?)
            }
        }
    }
}

impl fmt::Display for CalendarDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+} {}", self.amount, self.unit.name())
    }
}

fn add_months(instant: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        instant.checked_add_months(magnitude)
    } else {
        instant.checked_sub_months(magnitude)
    }
}

/// A parsed date-adjustment directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdjustmentDirective {
    /// Deltas applied, in order, to every segment start.
    Relative(Vec<CalendarDelta>),
    /// The first clip of the run is re-anchored to end at this instant.
    Absolute(NaiveDateTime),
}

impl AdjustmentDirective {
    /// Parse a directive string.
    ///
    /// A string made up entirely of `(+|-)<integer><unit>` tokens is
    /// relative; anything else must parse as a date or date-time.
    pub fn parse(directive: &str) -> TimelineResult<Self> {
        let trimmed = directive.trim();
        if trimmed.is_empty() {
            return Err(TimelineError::ambiguous(directive, "directive is empty"));
        }

        if trimmed.starts_with('+') || trimmed.starts_with('-') {
            return parse_deltas(trimmed)
                .map(AdjustmentDirective::Relative)
                .map_err(|reason| TimelineError::ambiguous(directive, reason));
        }

        parse_absolute(trimmed)
            .map(AdjustmentDirective::Absolute)
            .ok_or_else(|| {
                TimelineError::ambiguous(
                    directive,
                    "not a list of signed deltas and not a recognised date",
                )
            })
    }
}

impl fmt::Display for AdjustmentDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjustmentDirective::Relative(deltas) => {
                let parts: Vec<String> = deltas.iter().map(|d| d.to_string()).collect();
                write!(f, "relative [{}]", parts.join(", "))
            }
            AdjustmentDirective::Absolute(anchor) => {
                write!(f, "absolute {}", anchor.format("%Y-%m-%d %H:%M:%S"))
            }
        }
    }
}

/// Parse a whole string of signed deltas, e.g. `+1 year -2months +3d`.
fn parse_deltas(input: &str) -> Result<Vec<CalendarDelta>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut pos = 0;
    let mut deltas = Vec::new();

    let skip_ws = |pos: &mut usize| {
        while *pos < chars.len() && chars[*pos].is_whitespace() {
            *pos += 1;
        }
    };

    loop {
        skip_ws(&mut pos);
        if pos >= chars.len() {
            break;
        }

        let sign = match chars[pos] {
            '+' => 1,
            '-' => -1,
            other => return Err(format!("expected '+' or '-' but found '{}'", other)),
        };
        pos += 1;
        skip_ws(&mut pos);

        let digits_start = pos;
        while pos < chars.len() && chars[pos].is_ascii_digit() {
            pos += 1;
        }
        if digits_start == pos {
            return Err("expected an integer amount after the sign".to_string());
        }
        let digits: String = chars[digits_start..pos].iter().collect();
        let amount: i64 = digits
            .parse()
            .map_err(|_| format!("amount '{}' is too large", digits))?;
        skip_ws(&mut pos);

        let unit_start = pos;
        while pos < chars.len() && chars[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        if unit_start == pos {
            return Err(format!("missing unit after '{}'", digits));
        }
        let unit_name: String = chars[unit_start..pos].iter().collect();
        let unit = DeltaUnit::from_name(&unit_name)
            .ok_or_else(|| format!("unknown unit '{}'", unit_name))?;

        deltas.push(CalendarDelta::new(sign * amount, unit));
    }

    if deltas.is_empty() {
        return Err("no deltas found".to_string());
    }
    Ok(deltas)
}

/// Parse an absolute date or date-time in local wall-clock time.
fn parse_absolute(input: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    const DATE_TIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt);
        }
    }

    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Run-scoped wall-clock calculator.
///
/// Holds the active directive and, for absolute mode, the end time of the
/// first clip observed in the run. One adjuster is shared by every
/// directory processed in a run, so the absolute anchor is fixed by the
/// first clip of the first directory.
#[derive(Debug, Default)]
pub struct TimelineAdjuster {
    directive: Option<AdjustmentDirective>,
    first_end: OnceCell<NaiveDateTime>,
    absolute_offset: OnceCell<TimeDelta>,
}

impl TimelineAdjuster {
    /// Create an adjuster for an already-parsed directive.
    pub fn new(directive: Option<AdjustmentDirective>) -> Self {
        Self {
            directive,
            first_end: OnceCell::new(),
            absolute_offset: OnceCell::new(),
        }
    }

    /// Create an adjuster from the optional configuration string.
    ///
    /// A missing or blank string disables adjustment.
    pub fn from_setting(directive: Option<&str>) -> TimelineResult<Self> {
        match directive.map(str::trim).filter(|d| !d.is_empty()) {
            Some(d) => Ok(Self::new(Some(AdjustmentDirective::parse(d)?))),
            None => Ok(Self::new(None)),
        }
    }

    /// The active directive, if any.
    pub fn directive(&self) -> Option<&AdjustmentDirective> {
        self.directive.as_ref()
    }

    /// Raw end time of the first clip observed in this run.
    pub fn first_end(&self) -> Option<NaiveDateTime> {
        self.first_end.get().copied()
    }

    /// Record a clip; only the first call has any effect.
    pub fn observe(&self, source: &SourceFile) {
        self.first_end.get_or_init(|| source.modification_time);
    }

    /// Unadjusted start of a segment.
    pub fn raw_segment_start(source: &SourceFile, range: &SegmentSpec) -> TimelineResult<NaiveDateTime> {
        source
            .modification_time
            .checked_sub_signed(seconds_to_delta(source.duration_seconds))
            .and_then(|start| start.checked_add_signed(seconds_to_delta(range.start_offset)))
            .ok_or_else(|| {
                TimelineError::out_of_range(format!(
                    "computing the start of '{}'",
                    source.file_name()
                ))
            })
    }

    /// Adjusted start of a segment.
    pub fn segment_start(&self, source: &SourceFile, range: &SegmentSpec) -> TimelineResult<NaiveDateTime> {
        self.observe(source);
        let raw = Self::raw_segment_start(source, range)?;
        self.adjust(raw)
    }

    /// Apply the active directive to a raw instant.
    pub fn adjust(&self, raw: NaiveDateTime) -> TimelineResult<NaiveDateTime> {
        match &self.directive {
            None => Ok(raw),
            Some(AdjustmentDirective::Relative(deltas)) => {
                deltas.iter().try_fold(raw, |instant, delta| {
                    delta
                        .apply(instant)
                        .ok_or_else(|| TimelineError::out_of_range(format!("applying '{}'", delta)))
                })
            }
            Some(AdjustmentDirective::Absolute(anchor)) => {
                let offset = self.absolute_offset(*anchor)?;
                raw.checked_add_signed(offset)
                    .ok_or_else(|| TimelineError::out_of_range("applying the absolute anchor"))
            }
        }
    }

    /// Constant offset for absolute mode, fixed on first use.
    fn absolute_offset(&self, anchor: NaiveDateTime) -> TimelineResult<TimeDelta> {
        if let Some(offset) = self.absolute_offset.get() {
            return Ok(*offset);
        }
        let first_end = self.first_end().ok_or_else(|| {
            TimelineError::ambiguous(
                anchor.to_string(),
                "no clip has been observed to anchor the absolute date",
            )
        })?;
        let offset = *self
            .absolute_offset
            .get_or_init(|| anchor.signed_duration_since(first_end));
        tracing::debug!(
            "Absolute timestamp anchor: first clip ended {}, shifting by {}s",
            first_end,
            offset.num_seconds()
        );
        Ok(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaInfo;
    use std::sync::Arc;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn source(end: NaiveDateTime, duration: f64) -> SourceFile {
        SourceFile::new("/clips/a.mp4", Arc::new(MediaInfo::new(duration)), end)
    }

    #[test]
    fn parses_relative_directive() {
        let directive = AdjustmentDirective::parse("+1 year -1 month").unwrap();
        assert_eq!(
            directive,
            AdjustmentDirective::Relative(vec![
                CalendarDelta::new(1, DeltaUnit::Years),
                CalendarDelta::new(-1, DeltaUnit::Months),
            ])
        );

        let directive = AdjustmentDirective::parse("-3days+2h").unwrap();
        assert_eq!(
            directive,
            AdjustmentDirective::Relative(vec![
                CalendarDelta::new(-3, DeltaUnit::Days),
                CalendarDelta::new(2, DeltaUnit::Hours),
            ])
        );
    }

    #[test]
    fn single_letter_m_is_case_sensitive() {
        assert_eq!(DeltaUnit::from_name("M"), Some(DeltaUnit::Months));
        assert_eq!(DeltaUnit::from_name("m"), Some(DeltaUnit::Minutes));
        assert_eq!(DeltaUnit::from_name("MONTHS"), Some(DeltaUnit::Months));

        assert_eq!(
            AdjustmentDirective::parse("+1M -5m").unwrap(),
            AdjustmentDirective::Relative(vec![
                CalendarDelta::new(1, DeltaUnit::Months),
                CalendarDelta::new(-5, DeltaUnit::Minutes),
            ])
        );
    }

    #[test]
    fn parses_absolute_directive() {
        assert_eq!(
            AdjustmentDirective::parse("2025-06-01").unwrap(),
            AdjustmentDirective::Absolute(dt(2025, 6, 1, 0, 0, 0))
        );
        assert_eq!(
            AdjustmentDirective::parse("01/06/2025 14:30").unwrap(),
            AdjustmentDirective::Absolute(dt(2025, 6, 1, 14, 30, 0))
        );
    }

    #[test]
    fn rejects_unclean_directives() {
        for bad in ["+1 fortnight", "+1 year and a bit", "next tuesday", "+ year", "   "] {
            let err = AdjustmentDirective::parse(bad).unwrap_err();
            assert!(
                matches!(err, TimelineError::AmbiguousAdjustmentDirective { .. }),
                "{} should be ambiguous",
                bad
            );
        }
    }

    #[test]
    fn month_arithmetic_clamps_day_of_month() {
        let jan31 = dt(2024, 1, 31, 12, 0, 0);
        assert_eq!(
            CalendarDelta::new(1, DeltaUnit::Months).apply(jan31),
            Some(dt(2024, 2, 29, 12, 0, 0))
        );

        let leap_day = dt(2024, 2, 29, 0, 0, 0);
        assert_eq!(
            CalendarDelta::new(1, DeltaUnit::Years).apply(leap_day),
            Some(dt(2025, 2, 28, 0, 0, 0))
        );
    }

    #[test]
    fn relative_deltas_apply_in_order() {
        let adjuster = TimelineAdjuster::from_setting(Some("+1 year -1 month")).unwrap();
        let adjusted = adjuster.adjust(dt(2024, 1, 31, 8, 0, 0)).unwrap();
        // 2024-01-31 +1 year = 2025-01-31, -1 month = 2024-12-31
        assert_eq!(adjusted, dt(2024, 12, 31, 8, 0, 0));

        let adjuster = TimelineAdjuster::from_setting(Some("+1 month +1 year")).unwrap();
        let adjusted = adjuster.adjust(dt(2024, 1, 31, 8, 0, 0)).unwrap();
        assert_eq!(adjusted, dt(2025, 2, 28, 8, 0, 0));
    }

    #[test]
    fn raw_start_subtracts_duration_and_adds_offset() {
        let clip = source(dt(2024, 5, 1, 12, 0, 30), 30.0);
        let start = TimelineAdjuster::raw_segment_start(&clip, &SegmentSpec::new(10.0, 30.0)).unwrap();
        assert_eq!(start, dt(2024, 5, 1, 12, 0, 10));
    }

    #[test]
    fn no_directive_leaves_times_untouched() {
        let adjuster = TimelineAdjuster::from_setting(None).unwrap();
        let clip = source(dt(2024, 5, 1, 12, 0, 30), 30.0);
        let start = adjuster.segment_start(&clip, &SegmentSpec::full(30.0)).unwrap();
        assert_eq!(start, dt(2024, 5, 1, 12, 0, 0));
    }

    #[test]
    fn absolute_anchor_is_fixed_by_first_clip() {
        let adjuster = TimelineAdjuster::from_setting(Some("2025-06-01")).unwrap();

        let first = source(dt(2024, 1, 1, 0, 0, 0), 60.0);
        let later = source(dt(2024, 3, 10, 18, 45, 0), 20.0);

        let first_start = adjuster.segment_start(&first, &SegmentSpec::full(60.0)).unwrap();
        let later_start = adjuster.segment_start(&later, &SegmentSpec::full(20.0)).unwrap();

        let offset = TimeDelta::try_days(517).unwrap();
        assert_eq!(first_start, dt(2023, 12, 31, 23, 59, 0) + offset);
        assert_eq!(later_start, dt(2024, 3, 10, 18, 44, 40) + offset);
        assert_eq!(adjuster.first_end(), Some(dt(2024, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn blank_setting_disables_adjustment() {
        let adjuster = TimelineAdjuster::from_setting(Some("  ")).unwrap();
        assert!(adjuster.directive().is_none());
    }
}
