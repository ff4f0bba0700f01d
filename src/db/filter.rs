//! Translation of the query-string filter vocabulary into parameterized SQL.
//!
//! Every `/sales/*` endpoint shares the same contract: a date range on
//! `"Datetime"`, plus up to four optional exact-membership filters rendered as
//! `"col" = ANY($n::text[])` and an optional hour-of-day filter. The builder
//! owns the placeholder numbering so the callers never count `$n` by hand;
//! whatever index comes back in [`FilterClause::next_index`] is free for
//! trailing parameters such as LIMIT/OFFSET.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

use crate::{common::error::AppError, models::sales::SalesQuery};

/// Inclusive UTC bounds for the mandatory `"Datetime" BETWEEN $1 AND $2`
/// predicate. Always bound first, before any filter arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Parses `YYYY-MM-DD` strings into UTC start-of-day / end-of-day bounds.
    pub fn parse(start: &str, end: &str) -> Result<Self, AppError> {
        let start_date = NaiveDate::parse_from_str(start, "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDate(start.to_string()))?;
        let end_date = NaiveDate::parse_from_str(end, "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDate(end.to_string()))?;

        // End bound is the last representable millisecond of the day, so the
        // inclusive BETWEEN covers the whole end date.
        let end_of_day = end_date
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap_or_else(|| end_date.and_time(NaiveTime::MIN));

        Ok(Self {
            start: start_date.and_time(NaiveTime::MIN).and_utc(),
            end: end_of_day.and_utc(),
        })
    }

    /// Range for endpoints where the date parameters are mandatory.
    /// Rejects the request before any query is built.
    pub fn required(params: &SalesQuery) -> Result<Self, AppError> {
        match (non_empty(&params.start_date), non_empty(&params.end_date)) {
            (Some(start), Some(end)) => Self::parse(start, end),
            _ => Err(AppError::MissingDateRange),
        }
    }

    /// Range for the lookup endpoints that accept the dates as optional
    /// context. Both parameters must be present for the range to apply.
    pub fn optional(params: &SalesQuery) -> Result<Option<Self>, AppError> {
        match (non_empty(&params.start_date), non_empty(&params.end_date)) {
            (Some(start), Some(end)) => Ok(Some(Self::parse(start, end)?)),
            _ => Ok(None),
        }
    }

    /// The same calendar range one year earlier, for the year-over-year
    /// comparison chart. 29 Feb clamps to 28 Feb.
    pub fn previous_year(&self) -> Self {
        Self {
            start: shift_back_one_year(self.start),
            end: shift_back_one_year(self.end),
        }
    }
}

fn shift_back_one_year(moment: DateTime<Utc>) -> DateTime<Utc> {
    let date = moment.date_naive();
    let shifted = date
        .with_year(date.year() - 1)
        .or_else(|| NaiveDate::from_ymd_opt(date.year() - 1, 2, 28))
        .unwrap_or(date);
    shifted.and_time(moment.time()).and_utc()
}

/// One column constraint. The distinction between "the parameter was absent"
/// and "the parameter listed values" is load-bearing: an omitted filter means
/// unconstrained, never an empty-set match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    NoConstraint,
    AnyOf(Vec<String>),
}

impl Predicate {
    /// Splits a comma-separated query-string value. Absent or empty input
    /// yields `NoConstraint`; the values themselves are kept verbatim.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if !s.is_empty() => {
                Predicate::AnyOf(s.split(',').map(str::to_string).collect())
            }
            _ => Predicate::NoConstraint,
        }
    }

    pub fn values(&self) -> Option<&Vec<String>> {
        match self {
            Predicate::NoConstraint => None,
            Predicate::AnyOf(values) => Some(values),
        }
    }
}

/// Rendered SQL fragment plus the next free placeholder index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub sql: String,
    pub next_index: usize,
}

/// The full set of optional predicates for one request, in the fixed render
/// order Seller, Seller Category, Article_Name, Category, then hours. The
/// bind order of [`FilterSet::active_arrays`] matches the placeholder order
/// by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub sellers: Predicate,
    pub seller_categories: Predicate,
    pub article_names: Predicate,
    pub categories: Predicate,
    pub hours: Option<Vec<i32>>,
}

impl Default for Predicate {
    fn default() -> Self {
        Predicate::NoConstraint
    }
}

impl FilterSet {
    pub fn from_params(params: &SalesQuery) -> Result<Self, AppError> {
        Ok(Self {
            sellers: Predicate::from_param(non_empty(&params.sellers)),
            seller_categories: Predicate::from_param(non_empty(&params.seller_categories)),
            article_names: Predicate::from_param(non_empty(&params.article_names)),
            categories: Predicate::from_param(non_empty(&params.categories)),
            hours: parse_hours(non_empty(&params.hours))?,
        })
    }

    fn columns(&self) -> [(&'static str, &Predicate); 4] {
        [
            ("Seller", &self.sellers),
            ("Seller Category", &self.seller_categories),
            ("Article_Name", &self.article_names),
            ("Category", &self.categories),
        ]
    }

    fn conditions(&self, mut index: usize) -> (Vec<String>, usize) {
        let mut conditions = Vec::new();
        for (column, predicate) in self.columns() {
            if predicate.values().is_some() {
                conditions.push(format!("\"{column}\" = ANY(${index}::text[])"));
                index += 1;
            }
        }
        if self.hours.is_some() {
            conditions.push(format!(
                "EXTRACT(HOUR FROM \"Datetime\") = ANY(${index}::int[])"
            ));
            index += 1;
        }
        (conditions, index)
    }

    /// Fragment appended after a base `WHERE "Datetime" BETWEEN $1 AND $2`;
    /// callers pass the first free index (3 when only the dates precede it).
    pub fn and_clause(&self, first_index: usize) -> FilterClause {
        let (conditions, next_index) = self.conditions(first_index);
        let sql = conditions
            .iter()
            .map(|c| format!(" AND {c}"))
            .collect::<String>();
        FilterClause { sql, next_index }
    }

    /// Complete `WHERE` clause for the lookup endpoints, where even the date
    /// range is optional. Empty when nothing constrains the query.
    pub fn where_clause(&self, with_range: bool) -> FilterClause {
        let mut conditions = Vec::new();
        let mut index = 1;
        if with_range {
            conditions.push(format!("\"Datetime\" BETWEEN ${index} AND ${}", index + 1));
            index += 2;
        }
        let (filter_conditions, next_index) = self.conditions(index);
        conditions.extend(filter_conditions);

        let sql = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        FilterClause {
            sql,
            next_index,
        }
    }

    /// Active text arrays in render order, for binding after the dates.
    pub fn active_arrays(&self) -> impl Iterator<Item = &Vec<String>> {
        self.columns()
            .into_iter()
            .filter_map(|(_, predicate)| predicate.values())
    }

    pub fn hours(&self) -> Option<&Vec<i32>> {
        self.hours.as_ref()
    }
}

fn parse_hours(raw: Option<&str>) -> Result<Option<Vec<i32>>, AppError> {
    let Some(raw) = raw else { return Ok(None) };
    let hours = raw
        .split(',')
        .map(|h| h.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| AppError::InvalidHours(raw.to_string()))?;
    Ok(Some(hours))
}

// Empty query-string values count as absent, matching the observed behavior
// of the dashboard frontend which sends `sellers=` for "no selection".
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn params(pairs: &[(&str, &str)]) -> SalesQuery {
        let mut p = SalesQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "startDate" => p.start_date = value,
                "endDate" => p.end_date = value,
                "sellers" => p.sellers = value,
                "sellerCategories" => p.seller_categories = value,
                "articleNames" => p.article_names = value,
                "categories" => p.categories = value,
                "hours" => p.hours = value,
                other => panic!("unknown param {other}"),
            }
        }
        p
    }

    #[test]
    fn absent_filters_render_nothing() {
        let filter = FilterSet::from_params(&SalesQuery::default()).unwrap();
        let clause = filter.and_clause(3);
        assert_eq!(clause.sql, "");
        assert_eq!(clause.next_index, 3);
        assert_eq!(filter.active_arrays().count(), 0);
    }

    #[test]
    fn empty_string_filter_means_unconstrained() {
        let filter =
            FilterSet::from_params(&params(&[("sellers", ""), ("categories", "")])).unwrap();
        assert_eq!(filter.sellers, Predicate::NoConstraint);
        assert_eq!(filter.categories, Predicate::NoConstraint);
        assert_eq!(filter.and_clause(3).sql, "");
    }

    #[test]
    fn predicates_render_in_fixed_order_with_sequential_indices() {
        let filter = FilterSet::from_params(&params(&[
            ("categories", "Pizza,Drinks"),
            ("sellers", "Alice"),
            ("articleNames", "Margherita"),
        ]))
        .unwrap();

        let clause = filter.and_clause(3);
        assert_eq!(
            clause.sql,
            " AND \"Seller\" = ANY($3::text[]) \
             AND \"Article_Name\" = ANY($4::text[]) \
             AND \"Category\" = ANY($5::text[])"
        );
        assert_eq!(clause.next_index, 6);

        let arrays: Vec<_> = filter.active_arrays().collect();
        assert_eq!(arrays.len(), 3);
        assert_eq!(arrays[0], &vec!["Alice".to_string()]);
        assert_eq!(arrays[1], &vec!["Margherita".to_string()]);
        assert_eq!(
            arrays[2],
            &vec!["Pizza".to_string(), "Drinks".to_string()]
        );
    }

    #[test]
    fn hours_filter_renders_last() {
        let filter =
            FilterSet::from_params(&params(&[("sellers", "Alice"), ("hours", "9,10,11")]))
                .unwrap();
        let clause = filter.and_clause(3);
        assert_eq!(
            clause.sql,
            " AND \"Seller\" = ANY($3::text[]) \
             AND EXTRACT(HOUR FROM \"Datetime\") = ANY($4::int[])"
        );
        assert_eq!(clause.next_index, 5);
        assert_eq!(filter.hours(), Some(&vec![9, 10, 11]));
    }

    #[test]
    fn garbage_hours_are_rejected() {
        let err = FilterSet::from_params(&params(&[("hours", "9,noon")])).unwrap_err();
        assert!(matches!(err, AppError::InvalidHours(_)));
    }

    #[test]
    fn where_clause_without_any_constraint_is_empty() {
        let filter = FilterSet::default();
        let clause = filter.where_clause(false);
        assert_eq!(clause.sql, "");
        assert_eq!(clause.next_index, 1);
    }

    #[test]
    fn where_clause_numbers_dates_first() {
        let filter =
            FilterSet::from_params(&params(&[("sellerCategories", "Bar,Delivery")])).unwrap();
        let clause = filter.where_clause(true);
        assert_eq!(
            clause.sql,
            " WHERE \"Datetime\" BETWEEN $1 AND $2 \
             AND \"Seller Category\" = ANY($3::text[])"
        );
        assert_eq!(clause.next_index, 4);
    }

    #[test]
    fn comma_split_keeps_values_verbatim() {
        let predicate = Predicate::from_param(Some("Alice, Bob,"));
        assert_eq!(
            predicate.values().unwrap(),
            &vec!["Alice".to_string(), " Bob".to_string(), String::new()]
        );
    }

    #[test]
    fn date_range_spans_whole_days_utc() {
        let range = DateRange::parse("2024-01-05", "2024-01-06").unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap());
        assert_eq!(range.end.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
        assert_eq!((range.end.hour(), range.end.minute(), range.end.second()), (23, 59, 59));
    }

    #[test]
    fn missing_or_blank_dates_are_rejected_for_mandatory_endpoints() {
        let err = DateRange::required(&SalesQuery::default()).unwrap_err();
        assert!(matches!(err, AppError::MissingDateRange));

        let err = DateRange::required(&params(&[("startDate", "2024-01-01"), ("endDate", "")]))
            .unwrap_err();
        assert!(matches!(err, AppError::MissingDateRange));
    }

    #[test]
    fn unparseable_dates_are_a_validation_error() {
        let err =
            DateRange::required(&params(&[("startDate", "01/05/2024"), ("endDate", "2024-01-06")]))
                .unwrap_err();
        assert!(matches!(err, AppError::InvalidDate(_)));
    }

    #[test]
    fn optional_range_needs_both_bounds() {
        let none = DateRange::optional(&params(&[("startDate", "2024-01-01")])).unwrap();
        assert!(none.is_none());

        let some =
            DateRange::optional(&params(&[("startDate", "2024-01-01"), ("endDate", "2024-01-31")]))
                .unwrap();
        assert!(some.is_some());
    }

    #[test]
    fn previous_year_shifts_both_bounds() {
        let range = DateRange::parse("2025-04-01", "2025-04-07").unwrap();
        let shifted = range.previous_year();
        assert_eq!(shifted.start.date_naive(), NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(shifted.end.date_naive(), NaiveDate::from_ymd_opt(2024, 4, 7).unwrap());
    }

    #[test]
    fn previous_year_clamps_leap_day() {
        let range = DateRange::parse("2024-02-29", "2024-02-29").unwrap();
        let shifted = range.previous_year();
        assert_eq!(shifted.start.date_naive(), NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
        assert_eq!(shifted.end.date_naive(), NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
    }
}
