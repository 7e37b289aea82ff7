//! Result aggregation and presentation.
//!
//! Turns the raw, paginated payload of the results endpoint into the
//! renderable report: consecutive multi-turn rounds are grouped
//! ([`grouping`]), every item gets a deterministic verdict ([`verdict`]),
//! every run a resolved correction tag ([`correction`]), and the presenter
//! composes the page ([`presenter`]). Task-level correction statistics are
//! derived in [`summary`].
//!
//! Everything here is a pure projection of server-owned data. Nothing is
//! cached or mutated; the page is recomputed from the fetched snapshot.

use serde::{Deserialize, Serialize};

pub mod correction;
pub mod grouping;
pub mod presenter;
pub mod summary;
pub mod verdict;

pub use correction::{resolve_correction, CorrectionDisplay};
pub use grouping::{group_by_session, GroupedResult};
pub use presenter::{present_page, ReportPage};
pub use summary::{CorrectionAggregator, CorrectionStats};
pub use verdict::{classify_item, Verdict};

/// Color token attached to a presentation tag.
///
/// The closed palette the view maps onto its theme. Tags never carry
/// computed colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Green,
    Red,
    Orange,
    Neutral,
}
