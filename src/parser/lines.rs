//! Line scanner over a bulletin
//!
//! Section anchors are located independently from the top of the text since
//! bulletins do not guarantee section order. Table phases then read forward
//! from their anchor within an explicit line window.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

static ISSUED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^:Issued:").unwrap());
static SUMMARY_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*A\.\s*NOAA").unwrap());
static KP_TABLE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Kp\s+index\s+breakdown").unwrap());
static SOLAR_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Solar\s+Radiation\s+Storm\s+Forecast").unwrap());
static RADIO_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Radio\s+Blackout\s+Forecast").unwrap());
static RATIONALE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*Rationale:").unwrap());

/// Named phases of a bulletin scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    SeekIssued,
    SeekSummary,
    SeekTableTitle,
    ParseHeader,
    ParseRows,
    SeekSolarSection,
    SeekRadioSection,
}

impl ScanPhase {
    /// Phases that anchor on a line matched from the top of the bulletin
    pub const ANCHORS: [ScanPhase; 5] = [
        ScanPhase::SeekIssued,
        ScanPhase::SeekSummary,
        ScanPhase::SeekTableTitle,
        ScanPhase::SeekSolarSection,
        ScanPhase::SeekRadioSection,
    ];

    fn anchor_pattern(self) -> Option<&'static Regex> {
        match self {
            ScanPhase::SeekIssued => Some(&*ISSUED),
            ScanPhase::SeekSummary => Some(&*SUMMARY_HEADER),
            ScanPhase::SeekTableTitle => Some(&*KP_TABLE_TITLE),
            ScanPhase::SeekSolarSection => Some(&*SOLAR_SECTION),
            ScanPhase::SeekRadioSection => Some(&*RADIO_SECTION),
            ScanPhase::ParseHeader | ScanPhase::ParseRows => None,
        }
    }
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanPhase::SeekIssued => "seek-issued",
            ScanPhase::SeekSummary => "seek-summary",
            ScanPhase::SeekTableTitle => "seek-table-title",
            ScanPhase::ParseHeader => "parse-header",
            ScanPhase::ParseRows => "parse-rows",
            ScanPhase::SeekSolarSection => "seek-section-solar",
            ScanPhase::SeekRadioSection => "seek-section-radio",
        };
        f.pad(name)
    }
}

/// Bulletin text normalized into lines (carriage returns removed)
#[derive(Debug, Clone)]
pub struct BulletinLines {
    lines: Vec<String>,
}

impl BulletinLines {
    pub fn new(text: &str) -> Self {
        let lines = text.replace('\r', "").split('\n').map(String::from).collect();
        Self { lines }
    }

    /// True when the bulletin has no visible content at all
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.lines.iter().map(String::as_str).enumerate()
    }

    /// Every line from `start` to the end of the bulletin
    pub fn iter_from(&self, start: usize) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.iter().skip(start)
    }

    /// At most `limit` lines starting at `start` (inclusive)
    pub fn window(&self, start: usize, limit: usize) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.iter_from(start).take(limit)
    }

    /// First line matching the phase's anchor pattern, searched from the top
    pub fn seek(&self, phase: ScanPhase) -> Option<usize> {
        let pattern = phase.anchor_pattern()?;
        let found = self
            .iter()
            .find(|(_, line)| pattern.is_match(line))
            .map(|(idx, _)| idx);

        match found {
            Some(idx) => debug!(%phase, line = idx, "Anchor found"),
            None => debug!(%phase, "Anchor not found"),
        }
        found
    }

    pub fn next_non_blank(&self, start: usize) -> Option<usize> {
        self.iter_from(start)
            .find(|(_, line)| !line.trim().is_empty())
            .map(|(idx, _)| idx)
    }

    /// A table ends at a blank line or at its "Rationale:" paragraph
    pub fn is_table_end(line: &str) -> bool {
        line.trim().is_empty() || RATIONALE.is_match(line)
    }
}

/// Line index of every section anchor in a bulletin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionAnchors {
    pub issued: Option<usize>,
    pub summary: Option<usize>,
    pub kp_table_title: Option<usize>,
    pub solar_section: Option<usize>,
    pub radio_section: Option<usize>,
}

impl SectionAnchors {
    pub fn locate(lines: &BulletinLines) -> Self {
        Self {
            issued: lines.seek(ScanPhase::SeekIssued),
            summary: lines.seek(ScanPhase::SeekSummary),
            kp_table_title: lines.seek(ScanPhase::SeekTableTitle),
            solar_section: lines.seek(ScanPhase::SeekSolarSection),
            radio_section: lines.seek(ScanPhase::SeekRadioSection),
        }
    }

    pub fn get(&self, phase: ScanPhase) -> Option<usize> {
        match phase {
            ScanPhase::SeekIssued => self.issued,
            ScanPhase::SeekSummary => self.summary,
            ScanPhase::SeekTableTitle => self.kp_table_title,
            ScanPhase::SeekSolarSection => self.solar_section,
            ScanPhase::SeekRadioSection => self.radio_section,
            ScanPhase::ParseHeader | ScanPhase::ParseRows => None,
        }
    }

    /// Phase anchored on line `idx`, if any
    pub fn phase_at(&self, idx: usize) -> Option<ScanPhase> {
        ScanPhase::ANCHORS
            .into_iter()
            .find(|phase| self.get(*phase) == Some(idx))
    }
}
