//! Classification of `DEBUG_INFO` entries.
//!
//! Each entry describes one initial state slot `s_<index>` (the entry's
//! position in the table) and matches exactly one of three shapes:
//!
//! - `<kind> <id> share <k>` with `kind ∈ {secret, data}` — one share of a
//!   masked signal; the group identifier is `<kind>_<mangled(id)>`.
//! - `<kind> <id> unmasked` — a signal excluded from leakage modeling; its
//!   slot seeds the deletion set and taints everything derived from it.
//! - `mask <id>` — a fresh random, named `mask_<id>` (not mangled).
//!
//! An entry matching none of the shapes is fatal. The output DSL forbids
//! identifiers with leading digits, hence [`mangled_id`] substitutes each
//! digit with a letter (`0..9` → `a..j`).

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// One classified debug entry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DebugEntry {
    /// One share of a masked secret/data signal.
    Share {
        /// Mangled group identifier, e.g. `secret_a`.
        group: String,
        /// Share index `<k>` within the group.
        index: u32,
    },
    /// An unmasked signal, excluded from the leakage model.
    Unmasked {
        /// Mangled group identifier of the deleted signal.
        group: String,
    },
    /// A fresh random mask.
    Mask {
        /// Output-DSL mask name, e.g. `mask_0`.
        mask: String,
    },
}

/// A share group sized by the number of share entries seen for it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShareGroup {
    /// Mangled group identifier.
    pub id: String,
    /// Number of shares, i.e. the input vector is `id[0:shares-1]`.
    pub shares: u32,
}

/// Classified debug table: everything the evaluator seeds its context with.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DebugSummary {
    /// Share groups in first-seen order.
    pub share_groups: Vec<ShareGroup>,
    /// Mask names in first-seen order.
    pub masks: Vec<String>,
    /// Seed aliases: state slot name (`s_<index>`) to its terminal
    /// reference (`group[k]` or `mask_<id>`), in table order.
    pub aliases: Vec<(String, String)>,
    /// State slot names seeding the deletion set.
    pub deleted: Vec<String>,
}

/// Substitute digits with letters (`0..9` → `a..j`) so the result is legal
/// in an identifier grammar that forbids leading digits.
///
/// Returns `None` when the mangled result still is not a valid identifier
/// (empty, or containing characters outside `[A-Za-z_]` after mangling).
#[must_use]
pub fn mangled_id(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        let m = match c {
            '0'..='9' => (b'a' + (c as u8 - b'0')) as char,
            'a'..='z' | 'A'..='Z' | '_' => c,
            _ => return None,
        };
        out.push(m);
    }
    Some(out)
}

/// Classify a single entry. `index` is the entry's position in the table
/// and doubles as its state slot number.
///
/// # Errors
/// Fails on an entry matching no shape or on an unmanglable identifier.
pub fn classify_entry(index: usize, entry: &str) -> Result<DebugEntry, ParseError> {
    let unmatched = || ParseError::UnmatchedDebugEntry { index, entry: entry.to_owned() };
    let tokens: Vec<&str> = entry.split_whitespace().collect();

    match tokens.as_slice() {
        [kind @ ("secret" | "data"), id, "share", k] => {
            let group = share_group_id(index, kind, id)?;
            let index = k.parse::<u32>().map_err(|_| unmatched())?;
            Ok(DebugEntry::Share { group, index })
        }
        [kind @ ("secret" | "data"), id, "unmasked"] => {
            let group = share_group_id(index, kind, id)?;
            Ok(DebugEntry::Unmasked { group })
        }
        ["mask", id] => {
            if !id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') || id.is_empty() {
                return Err(ParseError::InvalidIdentifier { index, id: (*id).to_owned() });
            }
            Ok(DebugEntry::Mask { mask: format!("mask_{id}") })
        }
        _ => Err(unmatched()),
    }
}

fn share_group_id(index: usize, kind: &str, id: &str) -> Result<String, ParseError> {
    let mangled = mangled_id(id)
        .ok_or_else(|| ParseError::InvalidIdentifier { index, id: id.to_owned() })?;
    Ok(format!("{kind}_{mangled}"))
}

/// Classify the whole table and fold it into a [`DebugSummary`].
///
/// Share counts accumulate per group (count = number of share entries seen,
/// groups kept in first-seen order); masks keep table order.
///
/// # Errors
/// Propagates the first classification failure.
pub fn classify_entries(entries: &[String]) -> Result<DebugSummary, ParseError> {
    let mut summary = DebugSummary::default();
    for (index, entry) in entries.iter().enumerate() {
        let slot = format!("s_{index}");
        match classify_entry(index, entry)? {
            DebugEntry::Share { group, index: k } => {
                match summary.share_groups.iter_mut().find(|g| g.id == group) {
                    Some(g) => g.shares += 1,
                    None => summary.share_groups.push(ShareGroup { id: group.clone(), shares: 1 }),
                }
                summary.aliases.push((slot, format!("{group}[{k}]")));
            }
            DebugEntry::Unmasked { .. } => summary.deleted.push(slot),
            DebugEntry::Mask { mask } => {
                summary.aliases.push((slot, mask.clone()));
                summary.masks.push(mask);
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(entries: &[&str]) -> Result<DebugSummary, ParseError> {
        let owned: Vec<String> = entries.iter().map(|s| (*s).to_owned()).collect();
        classify_entries(&owned)
    }

    #[test]
    fn mangles_digits_to_letters() {
        assert_eq!(mangled_id("0").as_deref(), Some("a"));
        assert_eq!(mangled_id("19").as_deref(), Some("bj"));
        assert_eq!(mangled_id("key_3").as_deref(), Some("key_d"));
        assert_eq!(mangled_id("").as_deref(), None);
        assert_eq!(mangled_id("a-b").as_deref(), None);
    }

    #[test]
    fn classifies_share_groups_in_first_seen_order() {
        let s = classify(&[
            "secret 1 share 0",
            "data 0 share 0",
            "secret 1 share 1",
            "secret 1 share 2",
        ])
        .unwrap();
        assert_eq!(
            s.share_groups,
            vec![
                ShareGroup { id: "secret_b".into(), shares: 3 },
                ShareGroup { id: "data_a".into(), shares: 1 },
            ]
        );
        assert_eq!(
            s.aliases,
            vec![
                ("s_0".into(), "secret_b[0]".into()),
                ("s_1".into(), "data_a[0]".into()),
                ("s_2".into(), "secret_b[1]".into()),
                ("s_3".into(), "secret_b[2]".into()),
            ]
        );
    }

    #[test]
    fn classifies_masks_without_mangling() {
        let s = classify(&["mask 0", "mask 7"]).unwrap();
        assert_eq!(s.masks, vec!["mask_0", "mask_7"]);
        assert_eq!(
            s.aliases,
            vec![("s_0".into(), "mask_0".into()), ("s_1".into(), "mask_7".into())]
        );
    }

    #[test]
    fn unmasked_seeds_deletion_set() {
        let s = classify(&["secret 0 share 0", "data 2 unmasked"]).unwrap();
        assert_eq!(s.deleted, vec!["s_1"]);
    }

    #[test]
    fn unknown_entry_shape_is_fatal() {
        let err = classify(&["public 0 share 0"]).unwrap_err();
        assert!(matches!(err, ParseError::UnmatchedDebugEntry { index: 0, .. }));
    }

    #[test]
    fn unmanglable_identifier_is_fatal() {
        let err = classify(&["secret a-b share 0"]).unwrap_err();
        assert!(matches!(err, ParseError::InvalidIdentifier { index: 0, .. }));
    }
}
