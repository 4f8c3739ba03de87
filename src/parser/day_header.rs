use chrono::NaiveDate;
use tracing::warn;

use crate::model::DayLabel;
use crate::utils::{calendar_day, split_columns, year_offsets};

/// A bulletin table always has three day columns; extra label tokens are ignored.
pub const MAX_DAY_COLUMNS: usize = 3;

/// A header label resolved to its calendar day.
///
/// `column` is the label's position among the header's day labels, which is
/// also the position of its value in every data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayColumn {
    pub column: usize,
    pub label: DayLabel,
    pub day: NaiveDate,
}

/// Every day-label token on a line, in column order
pub fn day_labels(line: &str) -> Vec<DayLabel> {
    split_columns(line)
        .into_iter()
        .filter_map(DayLabel::parse)
        .collect()
}

/// Resolve ordered labels to calendar days, bumping the year once at a Dec -> Jan step.
///
/// Labels that do not form a real date in their year (e.g. "Feb 30") are
/// dropped; the remaining columns keep their positions.
pub fn resolve_day_columns(labels: &[DayLabel], base_year: i32) -> Vec<DayColumn> {
    let months: Vec<u32> = labels.iter().map(|l| l.month).collect();
    let offsets = year_offsets(&months);

    labels
        .iter()
        .zip(offsets)
        .enumerate()
        .filter_map(|(column, (label, offset))| {
            let year = base_year + offset;
            match calendar_day(year, label.month, label.day) {
                Some(day) => Some(DayColumn {
                    column,
                    label: label.clone(),
                    day,
                }),
                None => {
                    warn!("Day label '{}' is not a valid date in {}, skipping column", label, year);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(tokens: &[&str]) -> Vec<DayLabel> {
        tokens.iter().filter_map(|t| DayLabel::parse(t)).collect()
    }

    fn days(columns: &[DayColumn]) -> Vec<String> {
        columns.iter().map(|c| c.day.to_string()).collect()
    }

    #[test]
    fn test_day_labels_from_header() {
        let found = day_labels("             Oct 23       Oct 24       Oct 25");
        let texts: Vec<&str> = found.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Oct 23", "Oct 24", "Oct 25"]);
    }

    #[test]
    fn test_day_labels_skip_stray_tokens() {
        let found = day_labels("UT block    Oct 23    Oct 24    notes    Oct 25");
        assert_eq!(found.len(), 3);
        assert_eq!(found[2].text, "Oct 25");
    }

    #[test]
    fn test_day_labels_single_space_is_not_a_column_gap() {
        // Single-spaced labels collapse into one token that is not a label
        assert!(day_labels("Oct 23 Oct 24 Oct 25").is_empty());
    }

    #[test]
    fn test_resolve_without_rollover() {
        let columns = resolve_day_columns(&labels(&["Oct 23", "Oct 24", "Oct 25"]), 2025);
        assert_eq!(days(&columns), vec!["2025-10-23", "2025-10-24", "2025-10-25"]);
        assert_eq!(
            columns.iter().map(|c| c.column).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_resolve_with_rollover() {
        let columns = resolve_day_columns(&labels(&["Dec 30", "Dec 31", "Jan 1"]), 2024);
        assert_eq!(days(&columns), vec!["2024-12-30", "2024-12-31", "2025-01-01"]);
    }

    #[test]
    fn test_resolve_with_early_rollover() {
        let columns = resolve_day_columns(&labels(&["Dec 31", "Jan 01", "Jan 02"]), 2024);
        assert_eq!(days(&columns), vec!["2024-12-31", "2025-01-01", "2025-01-02"]);
    }

    #[test]
    fn test_resolve_drops_impossible_dates_but_keeps_positions() {
        let columns = resolve_day_columns(&labels(&["Feb 28", "Feb 30", "Mar 01"]), 2025);
        assert_eq!(days(&columns), vec!["2025-02-28", "2025-03-01"]);
        assert_eq!(
            columns.iter().map(|c| c.column).collect::<Vec<_>>(),
            vec![0, 2]
        );
    }
}
