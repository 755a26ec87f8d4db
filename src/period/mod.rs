//! Calendar period bucketing.
//!
//! Maps timestamps to canonical period keys and display labels for each
//! supported granularity. Keys are the grouping and sort identity: they are
//! zero-padded / ISO-ordered so that a plain lexicographic sort is always
//! chronological. Labels are for display only and never used for sorting.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::Error;

/// Aggregation granularity for period bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Granularity {
    /// Canonical start date of the bucket containing `date`.
    ///
    /// Weekly buckets always start on the Monday on/before the date.
    pub fn period_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => date,
            Granularity::Weekly => monday_of(date),
            Granularity::Monthly => date.with_day(1).unwrap_or(date),
            Granularity::Quarterly => {
                let quarter_month = ((date.month0() / 3) * 3) + 1;
                NaiveDate::from_ymd_opt(date.year(), quarter_month, 1).unwrap_or(date)
            }
            Granularity::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }

    /// Bucket key for `date`: the grouping identity, not shown to users.
    ///
    /// Lexicographic order over keys matches chronological order for every
    /// granularity (months and days are zero-padded).
    pub fn bucket_key(&self, date: NaiveDate) -> String {
        match self {
            Granularity::Daily => date.format("%Y-%m-%d").to_string(),
            Granularity::Weekly => monday_of(date).format("%Y-%m-%d").to_string(),
            Granularity::Monthly => date.format("%Y-%m").to_string(),
            Granularity::Quarterly => format!("{}-Q{}", date.year(), quarter_of(date)),
            Granularity::Yearly => date.year().to_string(),
        }
    }

    /// Human-readable label for the bucket containing `date`.
    pub fn bucket_label(&self, date: NaiveDate) -> String {
        match self {
            Granularity::Daily => date.format("%B %-d, %Y").to_string(),
            Granularity::Weekly => {
                format!("Week of {}", monday_of(date).format("%B %-d, %Y"))
            }
            Granularity::Monthly => date.format("%B %Y").to_string(),
            Granularity::Quarterly => format!("Q{} {}", quarter_of(date), date.year()),
            Granularity::Yearly => date.year().to_string(),
        }
    }

    /// Advance a date by one period step.
    pub fn advance(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => date + Duration::days(1),
            Granularity::Weekly => date + Duration::days(7),
            Granularity::Monthly => date + Months::new(1),
            Granularity::Quarterly => date + Months::new(3),
            Granularity::Yearly => date + Months::new(12),
        }
    }
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "D" | "DAY" | "DAYS" | "DAILY" => Ok(Granularity::Daily),
            "W" | "WEEK" | "WEEKS" | "WEEKLY" => Ok(Granularity::Weekly),
            "M" | "MONTH" | "MONTHS" | "MONTHLY" => Ok(Granularity::Monthly),
            "Q" | "QUARTER" | "QUARTERS" | "QUARTERLY" => Ok(Granularity::Quarterly),
            "Y" | "YEAR" | "YEARS" | "A" | "ANNUAL" | "ANNUALLY" | "YEARLY" => {
                Ok(Granularity::Yearly)
            }
            _ => Err(Error::InvalidGranularity(s.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Daily => write!(f, "daily"),
            Granularity::Weekly => write!(f, "weekly"),
            Granularity::Monthly => write!(f, "monthly"),
            Granularity::Quarterly => write!(f, "quarterly"),
            Granularity::Yearly => write!(f, "yearly"),
        }
    }
}

/// The Monday on/before `date`.
fn monday_of(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(offset)
}

/// 1-based quarter number.
fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_weekly_key_is_monday() {
        // 2024-03-04 is a Monday, 2024-03-06 a Wednesday, 2024-03-10 a Sunday
        assert_eq!(Granularity::Weekly.bucket_key(d(2024, 3, 4)), "2024-03-04");
        assert_eq!(Granularity::Weekly.bucket_key(d(2024, 3, 6)), "2024-03-04");
        assert_eq!(Granularity::Weekly.bucket_key(d(2024, 3, 10)), "2024-03-04");
        // Next Monday starts a new bucket
        assert_eq!(Granularity::Weekly.bucket_key(d(2024, 3, 11)), "2024-03-11");
    }

    #[test]
    fn test_monthly_key_zero_padded() {
        assert_eq!(Granularity::Monthly.bucket_key(d(2024, 3, 15)), "2024-03");
        assert_eq!(Granularity::Monthly.bucket_key(d(2024, 11, 1)), "2024-11");
        // Zero padding keeps lexicographic order chronological
        assert!(Granularity::Monthly.bucket_key(d(2024, 3, 1))
            < Granularity::Monthly.bucket_key(d(2024, 11, 1)));
    }

    #[test]
    fn test_quarterly_key_and_label() {
        assert_eq!(Granularity::Quarterly.bucket_key(d(2024, 1, 10)), "2024-Q1");
        assert_eq!(Granularity::Quarterly.bucket_key(d(2024, 6, 30)), "2024-Q2");
        assert_eq!(Granularity::Quarterly.bucket_key(d(2024, 12, 31)), "2024-Q4");
        assert_eq!(Granularity::Quarterly.bucket_label(d(2024, 6, 30)), "Q2 2024");
    }

    #[test]
    fn test_labels() {
        assert_eq!(Granularity::Daily.bucket_label(d(2024, 3, 6)), "March 6, 2024");
        assert_eq!(
            Granularity::Weekly.bucket_label(d(2024, 3, 6)),
            "Week of March 4, 2024"
        );
        assert_eq!(Granularity::Monthly.bucket_label(d(2024, 3, 6)), "March 2024");
        assert_eq!(Granularity::Yearly.bucket_label(d(2024, 3, 6)), "2024");
    }

    #[test]
    fn test_period_start() {
        assert_eq!(Granularity::Weekly.period_start(d(2024, 3, 6)), d(2024, 3, 4));
        assert_eq!(Granularity::Monthly.period_start(d(2024, 3, 6)), d(2024, 3, 1));
        assert_eq!(Granularity::Quarterly.period_start(d(2024, 5, 20)), d(2024, 4, 1));
        assert_eq!(Granularity::Yearly.period_start(d(2024, 5, 20)), d(2024, 1, 1));
    }

    #[test]
    fn test_advance() {
        assert_eq!(Granularity::Daily.advance(d(2024, 2, 28)), d(2024, 2, 29));
        assert_eq!(Granularity::Weekly.advance(d(2024, 3, 4)), d(2024, 3, 11));
        assert_eq!(Granularity::Monthly.advance(d(2024, 1, 31)), d(2024, 2, 29));
        assert_eq!(Granularity::Quarterly.advance(d(2024, 10, 1)), d(2025, 1, 1));
        assert_eq!(Granularity::Yearly.advance(d(2024, 3, 1)), d(2025, 3, 1));
    }

    #[test]
    fn test_key_order_matches_chronology() {
        let dates = [
            d(2023, 12, 31),
            d(2024, 1, 1),
            d(2024, 3, 9),
            d(2024, 11, 2),
            d(2025, 2, 1),
        ];
        for granularity in [
            Granularity::Daily,
            Granularity::Weekly,
            Granularity::Monthly,
            Granularity::Quarterly,
            Granularity::Yearly,
        ] {
            let keys: Vec<String> = dates.iter().map(|&dt| granularity.bucket_key(dt)).collect();
            let mut sorted = keys.clone();
            sorted.sort();
            assert_eq!(keys, sorted, "{granularity} keys must sort chronologically");
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("daily".parse::<Granularity>().unwrap(), Granularity::Daily);
        assert_eq!("W".parse::<Granularity>().unwrap(), Granularity::Weekly);
        assert_eq!("Quarterly".parse::<Granularity>().unwrap(), Granularity::Quarterly);
        assert!("fortnight".parse::<Granularity>().is_err());
    }
}
