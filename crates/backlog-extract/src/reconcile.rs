//! Reconciliation of paired remove/append entries into update entries.
//!
//! A remove and an append entry sharing an identifier usually mean the
//! curator is renaming an appearance in place, not removing one identity and
//! adding another. Such pairs are folded into [`UpdateEntry`] records.

use backlog_model::{ChangeEntry, UpdateEntry};

use crate::diag::warn_row;

/// Result of [`reconcile`]: the remove/append entries that did not pair up,
/// plus the inferred updates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reconciled {
    pub remove: Vec<ChangeEntry>,
    pub append: Vec<ChangeEntry>,
    pub updates: Vec<UpdateEntry>,
}

/// Infer appearance updates from one record's remove and append lists.
///
/// For every identifier present in both lists, the first remove entry and
/// first append entry bearing it form a candidate pair. The pair is accepted
/// as an update only when the names match and the appearances differ; both
/// members then move out of their lists into an [`UpdateEntry`] carrying the
/// append side's fields plus the remove side's appearance as
/// `old_appearance`.
///
/// A rejected pair whose remove entry is tagged `edit` is expected (the
/// profile is being replaced by an edited one) and skipped silently; any
/// other rejection is logged as an unexpected name/identifier mismatch. In
/// both cases the entries stay in their lists.
pub fn reconcile(remove: Vec<ChangeEntry>, append: Vec<ChangeEntry>, row_num: usize) -> Reconciled {
    let mut updates: Vec<UpdateEntry> = Vec::new();
    let mut matched_remove: Vec<usize> = Vec::new();
    let mut matched_append: Vec<usize> = Vec::new();

    for (a_idx, a_item) in append.iter().enumerate() {
        let Some(id) = a_item.id else {
            continue;
        };
        if matched_append.contains(&a_idx) {
            continue;
        }
        let Some(r_idx) = remove
            .iter()
            .position(|r| r.id == Some(id))
            .filter(|idx| !matched_remove.contains(idx))
        else {
            continue;
        };
        let r_item = &remove[r_idx];

        // Either this is not an update, or one of the IDs is wrong --
        // unless it is the aftermath of an edited profile.
        if r_item.name != a_item.name || r_item.appearance == a_item.appearance {
            if r_item.status.as_deref() == Some("edit") {
                continue;
            }
            warn_row!(
                row_num,
                "Unexpected name/ID:\n  [{id}] - {}\n  [{id}] - {}",
                r_item.display_name(),
                a_item.display_name(),
            );
            continue;
        }

        updates.push(UpdateEntry {
            id,
            name: a_item.name.clone(),
            appearance: a_item.appearance.clone(),
            old_appearance: r_item.appearance.clone(),
            disambiguation: a_item.disambiguation.clone(),
            status: a_item.status.clone(),
        });
        matched_remove.push(r_idx);
        matched_append.push(a_idx);
    }

    Reconciled {
        remove: remove
            .into_iter()
            .enumerate()
            .filter_map(|(idx, entry)| (!matched_remove.contains(&idx)).then_some(entry))
            .collect(),
        append: append
            .into_iter()
            .enumerate()
            .filter_map(|(idx, entry)| (!matched_append.contains(&idx)).then_some(entry))
            .collect(),
        updates,
    }
}
