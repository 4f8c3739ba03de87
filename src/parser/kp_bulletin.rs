use chrono::{TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, instrument};

use crate::clock::{Clock, SystemClock};
use crate::config::ScanLimits;
use crate::model::{BulletinMeta, HourBlock, KpBreakdownRow, KpBulletin, KpSeriesPoint, Summary};
use crate::parser::day_header::{day_labels, resolve_day_columns, DayColumn, MAX_DAY_COLUMNS};
use crate::parser::lines::{BulletinLines, ScanPhase};
use crate::utils::{leading_year, split_columns, trailing_year};

static ISSUED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^:Issued:\s*").unwrap());
static GREATEST_OBSERVED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)greatest observed.*?was\s+(\d+(?:\.\d+)?)").unwrap());
static GREATEST_EXPECTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)greatest expected.*?is\s+(\d+(?:\.\d+)?)").unwrap());
static KP_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d{2})-(\d{2})UT\s+(.+)$").unwrap());
// NOAA marks storm-level cells with their scale, e.g. "4.67 (G1)"
static SCALE_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)\s*$").unwrap());

pub const MIN_KP: f64 = 0.0;
pub const MAX_KP: f64 = 9.0;

/// Parser for the Kp sections of the NOAA 3-day forecast bulletin:
/// `:Issued:` line, section "A." prose summary and the Kp index breakdown table.
#[derive(Debug, Clone)]
pub struct KpBulletinParser<C = SystemClock> {
    limits: ScanLimits,
    clock: C,
}

impl KpBulletinParser<SystemClock> {
    pub fn new(limits: ScanLimits) -> Self {
        Self::with_clock(limits, SystemClock)
    }
}

impl Default for KpBulletinParser<SystemClock> {
    fn default() -> Self {
        Self::new(ScanLimits::default())
    }
}

impl<C: Clock> KpBulletinParser<C> {
    pub fn with_clock(limits: ScanLimits, clock: C) -> Self {
        Self { limits, clock }
    }

    /// Parse a bulletin. Never fails: absent sections leave their fields empty.
    ///
    /// `kp_series` is sorted by timestamp.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn parse(&self, text: &str) -> KpBulletin {
        let lines = BulletinLines::new(text);
        if lines.is_blank() {
            debug!("Bulletin text is empty");
            return KpBulletin::default();
        }

        let meta = parse_meta(&lines);
        let summary = self.parse_summary(&lines);

        let Some(title_idx) = lines.seek(ScanPhase::SeekTableTitle) else {
            info!("No Kp index breakdown table in bulletin");
            return KpBulletin {
                meta,
                summary,
                ..KpBulletin::default()
            };
        };

        let title = lines.get(title_idx).unwrap_or_default();
        let year = self.resolve_year(title, &meta);

        let Some(header_idx) = lines.next_non_blank(title_idx + 1) else {
            info!("Kp table title at line {} has no header row", title_idx);
            return KpBulletin {
                meta,
                summary,
                ..KpBulletin::default()
            };
        };

        let header = lines.get(header_idx).unwrap_or_default();
        let labels: Vec<_> = day_labels(header).into_iter().take(MAX_DAY_COLUMNS).collect();
        let columns = resolve_day_columns(&labels, year);
        debug!(
            phase = %ScanPhase::ParseHeader,
            line = header_idx,
            "Header row '{}' resolved to {} day columns",
            header.trim(),
            columns.len()
        );

        let kp_breakdown = parse_rows(&lines, header_idx + 1, &columns);
        let kp_series = flatten_series(&kp_breakdown, &columns);

        info!(
            "Parsed Kp table: {} days, {} rows, {} series points",
            columns.len(),
            kp_breakdown.len(),
            kp_series.len()
        );

        KpBulletin {
            meta,
            summary,
            kp_breakdown,
            days_label: columns.iter().map(|c| c.label.clone()).collect(),
            days_iso: columns.iter().map(|c| c.day).collect(),
            kp_series,
        }
    }

    fn parse_summary(&self, lines: &BulletinLines) -> Summary {
        let Some(start) = lines.seek(ScanPhase::SeekSummary) else {
            return Summary::default();
        };

        let block = lines
            .window(start, self.limits.summary_window)
            .map(|(_, line)| line)
            .collect::<Vec<_>>()
            .join("\n");

        let summary = Summary {
            greatest_observed_kp: capture_number(&GREATEST_OBSERVED, &block),
            greatest_expected_kp: capture_number(&GREATEST_EXPECTED, &block),
        };
        debug!(phase = %ScanPhase::SeekSummary, "Summary: {:?}", summary);
        summary
    }

    /// Title line year, then the issued year, then the clock
    fn resolve_year(&self, title: &str, meta: &BulletinMeta) -> i32 {
        if let Some(year) = trailing_year(title) {
            return year;
        }
        if let Some(year) = meta.issued.as_deref().and_then(leading_year) {
            debug!("Kp table title has no year, using issued year {}", year);
            return year;
        }
        let year = self.clock.current_year();
        debug!("No year in bulletin, using current year {}", year);
        year
    }
}

fn parse_meta(lines: &BulletinLines) -> BulletinMeta {
    let issued = lines
        .seek(ScanPhase::SeekIssued)
        .and_then(|idx| lines.get(idx))
        .map(|line| ISSUED_PREFIX.replace(line, "").trim().to_string())
        .filter(|issued| !issued.is_empty());

    BulletinMeta { issued }
}

fn capture_number(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Parse table rows from `start` until a blank line or "Rationale:".
///
/// Lines that do not start with an `HH-HHUT` block at column 0 are skipped.
fn parse_rows(lines: &BulletinLines, start: usize, columns: &[DayColumn]) -> Vec<KpBreakdownRow> {
    let mut rows = Vec::new();

    for (idx, line) in lines.iter_from(start) {
        if BulletinLines::is_table_end(line) {
            debug!(phase = %ScanPhase::ParseRows, line = idx, "Kp table ends");
            break;
        }

        let Some(cap) = KP_ROW.captures(line) else {
            debug!("Skipping non-row line {}: {}", idx, line.trim());
            continue;
        };
        let (Ok(start_hour), Ok(end_hour)) = (cap[1].parse::<u32>(), cap[2].parse::<u32>()) else {
            continue;
        };

        let tokens = split_columns(&cap[3]);
        let values = columns
            .iter()
            .map(|c| (c.day, tokens.get(c.column).and_then(|t| parse_kp_value(t))))
            .collect();

        rows.push(KpBreakdownRow {
            hour_block: HourBlock {
                start_hour,
                end_hour,
            },
            values,
        });
    }

    rows
}

/// Kp cell value, ignoring a trailing scale annotation.
///
/// Examples:
/// - "2.67" -> Some(2.67)
/// - "4.67 (G1)" -> Some(4.67)
/// - "" or "n/a" -> None
/// - "12.00" -> None (outside the Kp scale)
fn parse_kp_value(token: &str) -> Option<f64> {
    let cleaned = SCALE_ANNOTATION.replace(token, "");
    let value = cleaned.trim().parse::<f64>().ok()?;
    (MIN_KP..=MAX_KP).contains(&value).then_some(value)
}

/// One point per non-null cell, sorted by block start time
fn flatten_series(rows: &[KpBreakdownRow], columns: &[DayColumn]) -> Vec<KpSeriesPoint> {
    let mut series = Vec::new();

    for column in columns {
        for row in rows {
            let Some(kp) = row.value(column.day) else {
                continue;
            };
            let Some(start) = column.day.and_hms_opt(row.hour_block.start_hour, 0, 0) else {
                debug!("Hour block {} has no valid start hour", row.hour_block);
                continue;
            };
            series.push(KpSeriesPoint {
                iso: Utc.from_utc_datetime(&start),
                kp,
                day_index: column.column,
            });
        }
    }

    series.sort_by_key(|point| point.iso);
    series
}
