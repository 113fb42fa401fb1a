//! Stable, type-aware sorting.

use std::cmp::Ordering;

use chrono::NaiveDate;
use tally_core::{FieldValue, Fields};

use crate::query::SortDirection;

/// A field value reduced to what the comparator needs.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl SortKey {
    fn from_value(value: FieldValue) -> Self {
        match value {
            FieldValue::Number(n) => SortKey::Number(n),
            FieldValue::Date(d) => SortKey::Date(d),
            FieldValue::Text(s) | FieldValue::Tag(s) => SortKey::Text(s.to_lowercase()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Date(_) => 1,
            SortKey::Text(_) => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Sort rows in place by `key`.
///
/// The sort is stable in both directions. Rows missing the key go last
/// regardless of direction. If no row has the key the order is untouched.
pub fn sort_by<T: Fields>(rows: &mut Vec<T>, key: &str, direction: SortDirection) {
    let mut keyed: Vec<(Option<SortKey>, T)> = rows
        .drain(..)
        .map(|row| (row.field(key).map(SortKey::from_value), row))
        .collect();

    if keyed.iter().all(|(k, _)| k.is_none()) {
        tracing::debug!("Sort key {:?} not present on any row, keeping order", key);
        rows.extend(keyed.into_iter().map(|(_, row)| row));
        return;
    }

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => direction.apply(a.compare(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    rows.extend(keyed.into_iter().map(|(_, row)| row));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::Record;

    fn ids(rows: &[&Record]) -> Vec<String> {
        rows.iter().map(|r| r.id.to_string()).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        let records = vec![
            Record::new("a").with("price", 100.0),
            Record::new("b").with("price", 9.0),
            Record::new("c").with("price", 25.5),
        ];
        let mut rows: Vec<&Record> = records.iter().collect();
        sort_by(&mut rows, "price", SortDirection::Asc);
        assert_eq!(ids(&rows), vec!["b", "c", "a"]);

        sort_by(&mut rows, "price", SortDirection::Desc);
        assert_eq!(ids(&rows), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_text_ignores_case() {
        let records = vec![
            Record::new("1").with("name", "banana"),
            Record::new("2").with("name", "Apple"),
            Record::new("3").with("name", "cherry"),
        ];
        let mut rows: Vec<&Record> = records.iter().collect();
        sort_by(&mut rows, "name", SortDirection::Asc);
        assert_eq!(ids(&rows), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_dates_chronological() {
        let records = vec![
            Record::new("1").with("due", date(2024, 3, 1)),
            Record::new("2").with("due", date(2023, 12, 31)),
            Record::new("3").with("due", date(2024, 1, 15)),
        ];
        let mut rows: Vec<&Record> = records.iter().collect();
        sort_by(&mut rows, "due", SortDirection::Asc);
        assert_eq!(ids(&rows), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = vec![
            Record::new("1").with("status", "paid"),
            Record::new("2").with("status", "Pending"),
            Record::new("3").with("status", "PAID"),
            Record::new("4").with("status", "pending"),
        ];
        let mut rows: Vec<&Record> = records.iter().collect();
        sort_by(&mut rows, "status", SortDirection::Asc);
        assert_eq!(ids(&rows), vec!["1", "3", "2", "4"]);

        let mut rows: Vec<&Record> = records.iter().collect();
        sort_by(&mut rows, "status", SortDirection::Desc);
        assert_eq!(ids(&rows), vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn test_missing_key_sorts_last_both_ways() {
        let records = vec![
            Record::new("1"),
            Record::new("2").with("stock", 5.0),
            Record::new("3").with("stock", 1.0),
        ];
        let mut rows: Vec<&Record> = records.iter().collect();
        sort_by(&mut rows, "stock", SortDirection::Asc);
        assert_eq!(ids(&rows), vec!["3", "2", "1"]);

        sort_by(&mut rows, "stock", SortDirection::Desc);
        assert_eq!(ids(&rows), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_unknown_key_is_noop() {
        let records = vec![
            Record::new("b").with("price", 2.0),
            Record::new("a").with("price", 1.0),
        ];
        let mut rows: Vec<&Record> = records.iter().collect();
        sort_by(&mut rows, "nope", SortDirection::Desc);
        assert_eq!(ids(&rows), vec!["b", "a"]);
    }

    #[test]
    fn test_mixed_kinds_rank() {
        let records = vec![
            Record::new("text").with("v", "abc"),
            Record::new("date").with("v", date(2024, 1, 1)),
            Record::new("num").with("v", 3.0),
        ];
        let mut rows: Vec<&Record> = records.iter().collect();
        sort_by(&mut rows, "v", SortDirection::Asc);
        assert_eq!(ids(&rows), vec!["num", "date", "text"]);
    }
}
