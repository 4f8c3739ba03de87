// Bulletin parsers
//
// Both parsers are pure: raw bulletin text in, value objects out. A missing
// section, malformed row or unparsable number degrades to an empty field and
// a log line, never to an error.

pub mod day_header;
pub mod kp_bulletin;
pub mod lines;
pub mod probability;

pub use day_header::{DayColumn, MAX_DAY_COLUMNS};
pub use kp_bulletin::KpBulletinParser;
pub use lines::{BulletinLines, ScanPhase, SectionAnchors};
pub use probability::{ProbabilityParser, ProbabilitySection};
