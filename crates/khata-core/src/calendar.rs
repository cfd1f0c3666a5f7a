//! # Bikram Sambat Calendar Module
//!
//! Conversion between the civil (Gregorian, "AD") calendar and the Nepali
//! Bikram Sambat ("BS") lunar-solar calendar used for fiscal reporting.
//!
//! ## Why a Table?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE BS MONTH-LENGTH PROBLEM                                            │
//! │                                                                         │
//! │  Gregorian months have fixed lengths (plus one leap rule).              │
//! │  BS months do NOT: Baishakh 2080 has 31 days, Baishakh 2083 has 30.    │
//! │  A month can have 29, 30, 31 or 32 days, and the pattern changes       │
//! │  every year with no closed-form rule.                                  │
//! │                                                                         │
//! │  OUR SOLUTION: one fixed anchor pair plus a per-year table of the      │
//! │  twelve month lengths, and pure integer day-offset arithmetic          │
//! │  between the two. Outside the table we refuse to guess: a wrong        │
//! │  date on a tax document is worse than an error.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use chrono::NaiveDate;
//! use khata_core::calendar::{BsCalendar, BsDate};
//!
//! let cal = BsCalendar::seeded();
//!
//! // The anchor pair: Baishakh 1, 2080 BS == April 14, 2023 AD
//! let bs = cal.to_bs(NaiveDate::from_ymd_opt(2023, 4, 14).unwrap()).unwrap();
//! assert_eq!(bs, BsDate::new(2080, 1, 1));
//!
//! // And back again
//! let ad = cal.to_ad(bs).unwrap();
//! assert_eq!(ad, NaiveDate::from_ymd_opt(2023, 4, 14).unwrap());
//! ```

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoreError, CoreResult, ValidationError};

// =============================================================================
// Constants
// =============================================================================

/// The fiscal year starts on Shrawan 1 (BS month 4).
pub const FISCAL_YEAR_START_MONTH: u32 = 4;

/// The fiscal year ends on the last day of Ashad (BS month 3) of the
/// following BS year. The day itself varies by year and comes from the table.
pub const FISCAL_YEAR_END_MONTH: u32 = 3;

/// BS month names, 1-indexed (index 0 is a placeholder).
const MONTH_NAMES: [&str; 13] = [
    "",
    "Baishakh",
    "Jestha",
    "Ashad",
    "Shrawan",
    "Bhadra",
    "Ashwin",
    "Kartik",
    "Mangsir",
    "Poush",
    "Magh",
    "Falgun",
    "Chaitra",
];

/// Approximate Gregorian span of each BS month, 1-indexed.
const ENGLISH_SPANS: [&str; 13] = [
    "",
    "April-May",
    "May-June",
    "June-July",
    "July-August",
    "August-September",
    "September-October",
    "October-November",
    "November-December",
    "December-January",
    "January-February",
    "February-March",
    "March-April",
];

// =============================================================================
// BsDate
// =============================================================================

/// A date in the Bikram Sambat (BS) calendar.
///
/// ## Design Decisions
/// - **Pure value**: no identity, `Copy`, total order by (year, month, day)
/// - **String form is canonical**: serde and the database both use the
///   zero-padded `YYYY-MM-DD` rendering, so BS dates never get confused
///   with civil dates downstream
/// - **Day can be 32**: some BS months have 32 days, unlike any Gregorian
///   month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BsDate {
    pub year: i32,
    /// Month number, 1..=12 (Baishakh..Chaitra).
    pub month: u32,
    /// Day of month, 1..=32.
    pub day: u32,
}

impl BsDate {
    /// Creates a BS date from raw components.
    ///
    /// No table validation happens here; use [`BsCalendar::validate`] or
    /// [`BsCalendar::parse_date`] when the date must be a real calendar day.
    #[inline]
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        BsDate { year, month, day }
    }

    /// Returns the BS month name (e.g. `"Shrawan"` for month 4).
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::calendar::BsDate;
    ///
    /// assert_eq!(BsDate::new(2082, 4, 1).month_name(), "Shrawan");
    /// ```
    pub fn month_name(&self) -> &'static str {
        if (1..=12).contains(&self.month) {
            MONTH_NAMES[self.month as usize]
        } else {
            "Unknown"
        }
    }

    /// Returns the approximate Gregorian months this BS month spans
    /// (e.g. `"July-August"` for Shrawan).
    pub fn english_months(&self) -> &'static str {
        if (1..=12).contains(&self.month) {
            ENGLISH_SPANS[self.month as usize]
        } else {
            "Unknown"
        }
    }

    /// Returns the name of the fiscal year this date falls in.
    ///
    /// The fiscal year turns over on Shrawan 1 (month 4): Shrawan 2082
    /// onwards belongs to "2082/83", Baishakh..Ashad 2082 still belong to
    /// "2081/82".
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::calendar::BsDate;
    ///
    /// assert_eq!(BsDate::new(2082, 4, 1).fiscal_year_name(), "2082/83");
    /// assert_eq!(BsDate::new(2082, 3, 31).fiscal_year_name(), "2081/82");
    /// ```
    pub fn fiscal_year_name(&self) -> String {
        let start_year = if self.month >= FISCAL_YEAR_START_MONTH {
            self.year
        } else {
            self.year - 1
        };
        format!("{}/{:02}", start_year, (start_year + 1) % 100)
    }
}

/// Display renders the canonical zero-padded `YYYY-MM-DD` form.
///
/// This is the exact string stored in the database and emitted over serde,
/// so official documents can show the BS date without reconversion.
impl fmt::Display for BsDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for BsDate {
    type Err = ValidationError;

    /// Parses a `YYYY-MM-DD` string into a BS date.
    ///
    /// Only the shape is checked here (numeric parts, month 1..=12, day
    /// 1..=32). Whether the day actually exists in that month's table row
    /// is a [`BsCalendar`] concern.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidDate {
            date: s.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = s.splitn(3, '-');
        let year = parts
            .next()
            .and_then(|p| p.parse::<i32>().ok())
            .ok_or_else(|| invalid("expected YYYY-MM-DD"))?;
        let month = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| invalid("expected YYYY-MM-DD"))?;
        let day = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| invalid("expected YYYY-MM-DD"))?;

        if !(1..=12).contains(&month) {
            return Err(invalid("month must be 1..=12"));
        }
        if !(1..=32).contains(&day) {
            return Err(invalid("day must be 1..=32"));
        }

        Ok(BsDate { year, month, day })
    }
}

impl Serialize for BsDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BsDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// PeriodSpan
// =============================================================================

/// A fiscal period boundary pair expressed in both calendars.
///
/// Produced by [`BsCalendar::fiscal_year_span`] (canonical Shrawan-to-Ashad
/// year) or [`BsCalendar::span_from_civil`] (caller-supplied civil dates).
/// Both dates are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSpan {
    /// First day of the period, civil calendar.
    pub start_ad: NaiveDate,
    /// Last day of the period, civil calendar (inclusive).
    pub end_ad: NaiveDate,
    /// First day of the period, BS calendar.
    pub start_bs: BsDate,
    /// Last day of the period, BS calendar (inclusive).
    pub end_bs: BsDate,
}

// =============================================================================
// BsCalendar
// =============================================================================

/// An immutable BS↔AD conversion table.
///
/// ## Design Decisions
/// - **Injected value, not a singleton**: construct one (usually via
///   [`BsCalendar::seeded`]) and pass it to whatever needs conversions.
///   Extending the supported range is a data change, not a code change.
/// - **One anchor pair**: a civil date and its exact BS equivalent. All
///   conversions are integer day offsets from this pair.
/// - **Hard range edges**: any year missing from the table is
///   [`CoreError::CalendarOutOfRange`]. There is deliberately no default
///   month length.
///
/// ## Conversion Sketch
/// ```text
/// to_bs:  offset = civil - anchor_ad          (integer days)
///         walk month-by-month from anchor_bs until offset fits
///
/// to_ad:  index(bs)  = days from first table day to bs
///         anchor_ad + (index(bs) - index(anchor_bs))
/// ```
/// Both directions are linear in year-distance from the anchor, which is
/// effectively O(1) for the bounded table.
#[derive(Debug, Clone)]
pub struct BsCalendar {
    anchor_bs: BsDate,
    anchor_ad: NaiveDate,
    first_year: i32,
    /// Month lengths per year, indexed by `year - first_year`.
    months: Vec<[u32; 12]>,
    /// Day index of the anchor within the table, cached at construction.
    anchor_index: i64,
}

/// Month lengths for BS years 2080..=2090, Baishakh through Chaitra.
const SEEDED_FIRST_YEAR: i32 = 2080;
const SEEDED_MONTHS: [[u32; 12]; 11] = [
    [31, 32, 31, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2080
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2081
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2082
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2083
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2084
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2085
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2086
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2087
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2088
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2089
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2090
];

impl BsCalendar {
    /// Builds the calendar with the built-in table (BS 2080..=2090) and the
    /// anchor pair Baishakh 1, 2080 BS == April 14, 2023 AD.
    pub fn seeded() -> Self {
        // The seeded table is statically known-good, so construction cannot
        // fail here.
        Self::new(
            BsDate::new(2080, 1, 1),
            NaiveDate::from_ymd_opt(2023, 4, 14).expect("valid anchor date"),
            SEEDED_FIRST_YEAR,
            SEEDED_MONTHS.to_vec(),
        )
        .expect("seeded calendar table is valid")
    }

    /// Builds a calendar from a caller-supplied table.
    ///
    /// ## Arguments
    /// * `anchor_bs` / `anchor_ad` - a known-equivalent date pair
    /// * `first_year` - the BS year of `months[0]`
    /// * `months` - twelve month lengths per consecutive year
    ///
    /// ## Errors
    /// Fails if the table is empty, a month length is outside 29..=32, or
    /// the anchor does not name a real day inside the table.
    pub fn new(
        anchor_bs: BsDate,
        anchor_ad: NaiveDate,
        first_year: i32,
        months: Vec<[u32; 12]>,
    ) -> CoreResult<Self> {
        if months.is_empty() {
            return Err(ValidationError::Required {
                field: "month table".to_string(),
            }
            .into());
        }
        for (i, row) in months.iter().enumerate() {
            if row.iter().any(|&len| !(29..=32).contains(&len)) {
                return Err(ValidationError::InvalidDate {
                    date: format!("table year {}", first_year + i as i32),
                    reason: "month lengths must be 29..=32".to_string(),
                }
                .into());
            }
        }

        let mut cal = BsCalendar {
            anchor_bs,
            anchor_ad,
            first_year,
            months,
            anchor_index: 0,
        };
        cal.anchor_index = cal.day_index(anchor_bs)?;
        Ok(cal)
    }

    /// The inclusive range of BS years the table covers.
    pub fn supported_years(&self) -> RangeInclusive<i32> {
        self.first_year..=self.first_year + self.months.len() as i32 - 1
    }

    /// Returns the number of days in the given BS month.
    ///
    /// ## Errors
    /// `CalendarOutOfRange` for years missing from the table; an invalid
    /// month number is a validation error.
    pub fn days_in_month(&self, year: i32, month: u32) -> CoreResult<u32> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidDate {
                date: format!("{:04}-{:02}", year, month),
                reason: "month must be 1..=12".to_string(),
            }
            .into());
        }
        let row = self
            .months
            .get(usize::try_from(year - self.first_year).ok().ok_or_else(|| self.out_of_range(year))?)
            .ok_or_else(|| self.out_of_range(year))?;
        Ok(row[(month - 1) as usize])
    }

    /// Returns the total number of days in the given BS year.
    pub fn days_in_year(&self, year: i32) -> CoreResult<u32> {
        let idx = usize::try_from(year - self.first_year)
            .ok()
            .ok_or_else(|| self.out_of_range(year))?;
        let row = self.months.get(idx).ok_or_else(|| self.out_of_range(year))?;
        Ok(row.iter().sum())
    }

    /// Checks that a BS date names a real day within the table.
    pub fn validate(&self, bs: BsDate) -> CoreResult<()> {
        let max_day = self.days_in_month(bs.year, bs.month)?;
        if bs.day < 1 || bs.day > max_day {
            return Err(ValidationError::InvalidDate {
                date: bs.to_string(),
                reason: format!("day must be 1..={} in {} {}", max_day, bs.month_name(), bs.year),
            }
            .into());
        }
        Ok(())
    }

    /// Parses a `YYYY-MM-DD` BS date string and validates it against the
    /// table (so `2083-01-31` fails: Baishakh 2083 has only 30 days).
    pub fn parse_date(&self, s: &str) -> CoreResult<BsDate> {
        let bs: BsDate = s.parse().map_err(CoreError::from)?;
        self.validate(bs)?;
        Ok(bs)
    }

    /// Converts a civil (AD) date to its BS equivalent.
    ///
    /// ## Algorithm
    /// Compute the integer day offset from the anchor civil date, then walk
    /// month-by-month from the anchor BS date, consuming one table entry at
    /// a time, until the remainder fits inside the current month.
    ///
    /// ## Errors
    /// `CalendarOutOfRange` as soon as the walk needs a year the table does
    /// not cover.
    pub fn to_bs(&self, ad: NaiveDate) -> CoreResult<BsDate> {
        let offset = (ad - self.anchor_ad).num_days();

        let mut year = self.anchor_bs.year;
        let mut month = self.anchor_bs.month;
        let mut day = i64::from(self.anchor_bs.day) + offset;

        // Walk forward while the day count overflows the current month.
        loop {
            let len = i64::from(self.days_in_month(year, month)?);
            if day <= len {
                break;
            }
            day -= len;
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }

        // Walk backward while the day count underflows.
        while day <= 0 {
            if month == 1 {
                month = 12;
                year -= 1;
            } else {
                month -= 1;
            }
            day += i64::from(self.days_in_month(year, month)?);
        }

        Ok(BsDate::new(year, month, day as u32))
    }

    /// Converts a BS date to its civil (AD) equivalent.
    ///
    /// The inverse of [`to_bs`](Self::to_bs): accumulate whole years and
    /// months of table entries into a day index, then offset the anchor
    /// civil date by the distance from the anchor's own index.
    pub fn to_ad(&self, bs: BsDate) -> CoreResult<NaiveDate> {
        let index = self.day_index(bs)?;
        Ok(self.anchor_ad + Duration::days(index - self.anchor_index))
    }

    /// Computes the canonical fiscal year span for the year starting at
    /// Shrawan 1 of `start_year`.
    ///
    /// The end date is the true last day of Ashad in the following BS year,
    /// read from the table — NOT a fixed day number, since Ashad has 31
    /// days in some years and 32 in others.
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::calendar::{BsCalendar, BsDate};
    ///
    /// let cal = BsCalendar::seeded();
    /// let span = cal.fiscal_year_span(2082).unwrap();
    /// assert_eq!(span.start_bs, BsDate::new(2082, 4, 1));
    /// assert_eq!(span.end_bs, BsDate::new(2083, 3, 31)); // Ashad 2083: 31 days
    /// ```
    pub fn fiscal_year_span(&self, start_year: i32) -> CoreResult<PeriodSpan> {
        let start_bs = BsDate::new(start_year, FISCAL_YEAR_START_MONTH, 1);
        let end_day = self.days_in_month(start_year + 1, FISCAL_YEAR_END_MONTH)?;
        let end_bs = BsDate::new(start_year + 1, FISCAL_YEAR_END_MONTH, end_day);

        Ok(PeriodSpan {
            start_ad: self.to_ad(start_bs)?,
            end_ad: self.to_ad(end_bs)?,
            start_bs,
            end_bs,
        })
    }

    /// Derives a period span from caller-supplied civil boundary dates.
    ///
    /// ## Errors
    /// `EndBeforeStart` unless `end` falls strictly after `start`;
    /// `CalendarOutOfRange` if either date converts outside the table.
    pub fn span_from_civil(&self, start: NaiveDate, end: NaiveDate) -> CoreResult<PeriodSpan> {
        if end <= start {
            return Err(ValidationError::EndBeforeStart {
                start: start.to_string(),
                end: end.to_string(),
            }
            .into());
        }
        Ok(PeriodSpan {
            start_ad: start,
            end_ad: end,
            start_bs: self.to_bs(start)?,
            end_bs: self.to_bs(end)?,
        })
    }

    /// Day index of a BS date counted from the first day of the first table
    /// year. Exact for every date inside the table.
    fn day_index(&self, bs: BsDate) -> CoreResult<i64> {
        self.validate(bs)?;

        let mut total: i64 = 0;
        for year in self.first_year..bs.year {
            total += i64::from(self.days_in_year(year)?);
        }
        for month in 1..bs.month {
            total += i64::from(self.days_in_month(bs.year, month)?);
        }
        Ok(total + i64::from(bs.day) - 1)
    }

    fn out_of_range(&self, year: i32) -> CoreError {
        let range = self.supported_years();
        CoreError::CalendarOutOfRange {
            year,
            min_year: *range.start(),
            max_year: *range.end(),
        }
    }
}

impl Default for BsCalendar {
    fn default() -> Self {
        BsCalendar::seeded()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cal() -> BsCalendar {
        BsCalendar::seeded()
    }

    fn ad(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_anchor_pair() {
        let cal = cal();
        assert_eq!(cal.to_bs(ad(2023, 4, 14)).unwrap(), BsDate::new(2080, 1, 1));
        assert_eq!(cal.to_ad(BsDate::new(2080, 1, 1)).unwrap(), ad(2023, 4, 14));
    }

    #[test]
    fn test_known_conversions() {
        let cal = cal();

        // Last day of Baishakh 2080 (31 days), then the month boundary
        assert_eq!(cal.to_bs(ad(2023, 5, 14)).unwrap(), BsDate::new(2080, 1, 31));
        assert_eq!(cal.to_bs(ad(2023, 5, 15)).unwrap(), BsDate::new(2080, 2, 1));

        // Start of fiscal year 2082/83: Shrawan 1, 2082
        assert_eq!(cal.to_ad(BsDate::new(2082, 4, 1)).unwrap(), ad(2025, 7, 16));
        assert_eq!(cal.to_bs(ad(2025, 7, 16)).unwrap(), BsDate::new(2082, 4, 1));
    }

    #[test]
    fn test_round_trip_and_ordering_over_full_table() {
        let cal = cal();

        let total: u32 = cal
            .supported_years()
            .map(|y| cal.days_in_year(y).unwrap())
            .sum();

        let mut prev: Option<BsDate> = None;
        for i in 0..total {
            let civil = ad(2023, 4, 14) + Duration::days(i64::from(i));
            let bs = cal.to_bs(civil).unwrap();

            // to_ad(to_bs(d)) == d for every day in range
            assert_eq!(cal.to_ad(bs).unwrap(), civil, "round trip failed at {}", bs);

            // Later civil dates map to strictly later BS dates
            if let Some(p) = prev {
                assert!(bs > p, "ordering violated: {} !> {}", bs, p);
            }
            prev = Some(bs);
        }
    }

    #[test]
    fn test_out_of_range_is_an_error_not_a_guess() {
        let cal = cal();

        // One day before the anchor needs BS 2079, which is not seeded
        let err = cal.to_bs(ad(2023, 4, 13)).unwrap_err();
        assert!(matches!(err, CoreError::CalendarOutOfRange { year: 2079, .. }));

        // One day past the last table day needs BS 2091
        let total: u32 = cal
            .supported_years()
            .map(|y| cal.days_in_year(y).unwrap())
            .sum();
        let past_end = ad(2023, 4, 14) + Duration::days(i64::from(total));
        let err = cal.to_bs(past_end).unwrap_err();
        assert!(matches!(err, CoreError::CalendarOutOfRange { year: 2091, .. }));

        // And the BS → AD direction refuses unseeded years symmetrically
        assert!(cal.to_ad(BsDate::new(2079, 12, 30)).is_err());
        assert!(cal.to_ad(BsDate::new(2091, 1, 1)).is_err());
    }

    #[test]
    fn test_days_in_month_varies_by_year() {
        let cal = cal();
        assert_eq!(cal.days_in_month(2080, 1).unwrap(), 31);
        assert_eq!(cal.days_in_month(2083, 1).unwrap(), 30);
        assert_eq!(cal.days_in_month(2080, 2).unwrap(), 32);
        assert!(cal.days_in_month(2079, 1).is_err());
        assert!(cal.days_in_month(2080, 13).is_err());
    }

    #[test]
    fn test_validate_rejects_table_invalid_days() {
        let cal = cal();
        assert!(cal.validate(BsDate::new(2080, 1, 31)).is_ok());
        // Baishakh 2080 has 31 days, so day 32 does not exist
        assert!(cal.validate(BsDate::new(2080, 1, 32)).is_err());
        // Jestha 2080 has 32 days, so day 32 is real there
        assert!(cal.validate(BsDate::new(2080, 2, 32)).is_ok());
    }

    #[test]
    fn test_fiscal_year_span_uses_true_last_day() {
        let cal = cal();

        let span = cal.fiscal_year_span(2082).unwrap();
        assert_eq!(span.start_bs, BsDate::new(2082, 4, 1));
        // Ashad 2083 has 31 days, not 32
        assert_eq!(span.end_bs, BsDate::new(2083, 3, 31));
        assert_eq!(span.start_ad, ad(2025, 7, 16));
        assert_eq!(span.end_ad, ad(2026, 7, 15));

        // Consecutive fiscal years tile the calendar with no gap or overlap
        let next = cal.fiscal_year_span(2083).unwrap();
        assert_eq!(next.start_ad, span.end_ad + Duration::days(1));

        // A year whose end falls outside the table is refused
        assert!(cal.fiscal_year_span(2090).is_err());
        assert!(cal.fiscal_year_span(2079).is_err());
    }

    #[test]
    fn test_span_from_civil() {
        let cal = cal();

        let span = cal.span_from_civil(ad(2025, 7, 16), ad(2026, 7, 15)).unwrap();
        assert_eq!(span.start_bs, BsDate::new(2082, 4, 1));
        assert_eq!(span.end_bs, BsDate::new(2083, 3, 31));

        let err = cal.span_from_civil(ad(2025, 7, 16), ad(2025, 7, 16)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn test_parse_date() {
        let cal = cal();
        assert_eq!(cal.parse_date("2082-04-01").unwrap(), BsDate::new(2082, 4, 1));
        // Shape-valid but not a real day in the table
        assert!(cal.parse_date("2083-01-31").is_err());
        assert!(cal.parse_date("2082-13-01").is_err());
        assert!(cal.parse_date("not-a-date").is_err());
    }

    #[test]
    fn test_bs_date_display_and_parse() {
        let date = BsDate::new(2082, 4, 1);
        assert_eq!(date.to_string(), "2082-04-01");
        assert_eq!("2082-04-01".parse::<BsDate>().unwrap(), date);
        assert!("2082-00-10".parse::<BsDate>().is_err());
        assert!("2082-04-33".parse::<BsDate>().is_err());
    }

    #[test]
    fn test_month_names() {
        assert_eq!(BsDate::new(2082, 1, 1).month_name(), "Baishakh");
        assert_eq!(BsDate::new(2082, 12, 1).month_name(), "Chaitra");
        assert_eq!(BsDate::new(2082, 4, 1).english_months(), "July-August");
    }

    #[test]
    fn test_fiscal_year_name() {
        assert_eq!(BsDate::new(2082, 4, 1).fiscal_year_name(), "2082/83");
        assert_eq!(BsDate::new(2082, 12, 30).fiscal_year_name(), "2082/83");
        assert_eq!(BsDate::new(2082, 3, 31).fiscal_year_name(), "2081/82");
        // Century rollover in the short code
        assert_eq!(BsDate::new(2099, 5, 1).fiscal_year_name(), "2099/00");
    }

    #[test]
    fn test_custom_table_rejects_bad_rows() {
        let bad = vec![[28u32, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30]];
        let result = BsCalendar::new(
            BsDate::new(2100, 1, 1),
            ad(2043, 4, 14),
            2100,
            bad,
        );
        assert!(result.is_err());
    }
}
