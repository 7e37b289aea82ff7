//! Session grouping of the result page.
//!
//! Partitions the ordered items of one page into contiguous multi-turn
//! session groups and standalone singletons. The partition is strictly
//! streaming: one left-to-right pass, no lookahead, no state across pages.
//! A session split by a pagination boundary therefore yields one group per
//! page, which is the intended presentation.

use serde::Serialize;

use crate::types::EvaluationItem;

/// A maximal run of consecutive items sharing one non-null session key, or
/// a singleton for a standalone item.
///
/// Derived per page render, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedResult {
    /// The shared session key, `None` for a standalone item.
    pub session_group: Option<String>,
    /// The member items, in input order.
    pub items: Vec<EvaluationItem>,
}

impl GroupedResult {
    /// Whether this group renders as a multi-turn session.
    ///
    /// True for any keyed group, including a keyed group of size one; only
    /// the presence of the key distinguishes it from a standalone item.
    pub fn is_session(&self) -> bool {
        self.session_group.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Partition a page of items into ordered groups.
///
/// An item extends the currently open group only when both carry the same
/// non-null session key. Items without a key always form their own
/// singleton. Two separated runs of the same key stay two distinct groups;
/// the pass never merges across an intervening item.
pub fn group_by_session(items: Vec<EvaluationItem>) -> Vec<GroupedResult> {
    let mut groups: Vec<GroupedResult> = Vec::new();

    for item in items {
        let extends_open = match (&item.session_group, groups.last()) {
            (Some(key), Some(open)) => open.session_group.as_deref() == Some(key.as_str()),
            _ => false,
        };

        if extends_open {
            // Checked non-empty above.
            if let Some(open) = groups.last_mut() {
                open.items.push(item);
            }
        } else {
            groups.push(GroupedResult {
                session_group: item.session_group.clone(),
                items: vec![item],
            });
        }
    }

    groups
}
