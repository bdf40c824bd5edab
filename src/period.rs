// Period keys: the bucket a date falls into for a given granularity.
//
// Keys are typed so the aggregator and the zero-fill expansion always agree
// on their shape; the string form only exists at the output boundary.
use crate::error::{ReportError, Result};
use crate::types::Granularity;
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Weekly zero-fill always emits this many weeks per year, including a
/// trailing `W53` that stays empty for 52-week ISO years.
pub const WEEKS_PER_YEAR: u32 = 53;

/// Variants are ordered chronologically within a single granularity; keys of
/// different granularities are never mixed in one map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    Day(NaiveDate),
    /// ISO-8601 week; `iso_year` may differ from the calendar year near Jan 1.
    Week { iso_year: i32, week: u32 },
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
    Year(i32),
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            PeriodKey::Week { iso_year, week } => write!(f, "{:04} W{:02}", iso_year, week),
            PeriodKey::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            PeriodKey::Quarter { year, quarter } => write!(f, "{:04} Q{}", year, quarter),
            PeriodKey::Year(year) => write!(f, "{:04}", year),
        }
    }
}

pub fn period_key(date: NaiveDate, granularity: Granularity) -> PeriodKey {
    match granularity {
        Granularity::Daily => PeriodKey::Day(date),
        Granularity::Weekly => {
            // chrono's ISO week: the week containing the date's Thursday
            // decides the year, so Dec 29..31 may land in W01 of year + 1.
            let iso = date.iso_week();
            PeriodKey::Week {
                iso_year: iso.year(),
                week: iso.week(),
            }
        }
        Granularity::Monthly => PeriodKey::Month {
            year: date.year(),
            month: date.month(),
        },
        Granularity::Quarterly => PeriodKey::Quarter {
            year: date.year(),
            quarter: date.month0() / 3 + 1,
        },
        Granularity::Yearly => PeriodKey::Year(date.year()),
    }
}

/// Every period of `year` for `granularity`, in chronological order.
pub fn periods_in_year(granularity: Granularity, year: i32) -> Result<Vec<PeriodKey>> {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(ReportError::YearOutOfRange(year))?;
    let keys = match granularity {
        Granularity::Daily => {
            let mut days = Vec::with_capacity(366);
            let mut day = Some(jan1);
            while let Some(d) = day.filter(|d| d.year() == year) {
                days.push(PeriodKey::Day(d));
                day = d.succ_opt();
            }
            days
        }
        Granularity::Weekly => (1..=WEEKS_PER_YEAR)
            .map(|week| PeriodKey::Week {
                iso_year: year,
                week,
            })
            .collect(),
        Granularity::Monthly => (1..=12).map(|month| PeriodKey::Month { year, month }).collect(),
        Granularity::Quarterly => (1..=4)
            .map(|quarter| PeriodKey::Quarter { year, quarter })
            .collect(),
        Granularity::Yearly => vec![PeriodKey::Year(year)],
    };
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn key(date: NaiveDate, g: Granularity) -> String {
        period_key(date, g).to_string()
    }

    #[test]
    fn string_formats() {
        let d = ymd(2024, 3, 5);
        assert_eq!(key(d, Granularity::Daily), "2024-03-05");
        assert_eq!(key(d, Granularity::Weekly), "2024 W10");
        assert_eq!(key(d, Granularity::Monthly), "2024-03");
        assert_eq!(key(d, Granularity::Quarterly), "2024 Q1");
        assert_eq!(key(d, Granularity::Yearly), "2024");
    }

    #[test]
    fn quarters_split_on_three_month_boundaries() {
        assert_eq!(key(ymd(2024, 3, 31), Granularity::Quarterly), "2024 Q1");
        assert_eq!(key(ymd(2024, 4, 1), Granularity::Quarterly), "2024 Q2");
        assert_eq!(key(ymd(2024, 9, 30), Granularity::Quarterly), "2024 Q3");
        assert_eq!(key(ymd(2024, 12, 31), Granularity::Quarterly), "2024 Q4");
    }

    #[test]
    fn iso_week_crosses_calendar_year() {
        // Monday Dec 31, 2018 belongs to the first week of 2019.
        assert_eq!(key(ymd(2018, 12, 31), Granularity::Weekly), "2019 W01");
        // Friday Jan 1, 2021 belongs to the last week of 2020.
        assert_eq!(key(ymd(2021, 1, 1), Granularity::Weekly), "2020 W53");
        // Sunday Jan 1, 2023 belongs to week 52 of 2022.
        assert_eq!(key(ymd(2023, 1, 1), Granularity::Weekly), "2022 W52");
        assert_eq!(key(ymd(2024, 1, 1), Granularity::Weekly), "2024 W01");
    }

    #[test]
    fn sunday_closes_its_iso_week() {
        assert_eq!(key(ymd(2024, 3, 10), Granularity::Weekly), "2024 W10");
        assert_eq!(key(ymd(2024, 3, 11), Granularity::Weekly), "2024 W11");
    }

    #[test]
    fn period_counts_per_year() {
        let count = |g, y| periods_in_year(g, y).unwrap().len();
        assert_eq!(count(Granularity::Yearly, 2024), 1);
        assert_eq!(count(Granularity::Quarterly, 2024), 4);
        assert_eq!(count(Granularity::Monthly, 2024), 12);
        assert_eq!(count(Granularity::Weekly, 2023), 53);
        assert_eq!(count(Granularity::Daily, 2024), 366);
        assert_eq!(count(Granularity::Daily, 2023), 365);
        assert_eq!(count(Granularity::Daily, 1900), 365);
        assert_eq!(count(Granularity::Daily, 2000), 366);
    }

    #[test]
    fn enumeration_is_chronological_and_bounded() {
        let days = periods_in_year(Granularity::Daily, 2023).unwrap();
        assert_eq!(days.first().unwrap().to_string(), "2023-01-01");
        assert_eq!(days.last().unwrap().to_string(), "2023-12-31");
        assert!(days.windows(2).all(|w| w[0] < w[1]));

        let weeks = periods_in_year(Granularity::Weekly, 2024).unwrap();
        assert_eq!(weeks[0].to_string(), "2024 W01");
        assert_eq!(weeks[52].to_string(), "2024 W53");
    }

    #[test]
    fn out_of_range_year_is_an_error() {
        assert!(matches!(
            periods_in_year(Granularity::Monthly, 1_000_000),
            Err(ReportError::YearOutOfRange(1_000_000))
        ));
    }
}
