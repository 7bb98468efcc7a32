//! Document changes: validated edit sets applied atomically to a rope.
//!
//! All positions are char offsets into the document.

use ropey::Rope;
use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeSpec {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl ChangeSpec {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            from: at,
            to: at,
            insert: text.into(),
        }
    }

    pub fn delete(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            insert: String::new(),
        }
    }

    pub fn replace(from: usize, to: usize, text: impl Into<String>) -> Self {
        Self {
            from,
            to,
            insert: text.into(),
        }
    }

    fn is_noop(&self) -> bool {
        self.from == self.to && self.insert.is_empty()
    }
}

/// Which side of an insertion point a mapped position sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Before,
    After,
}

/// A sorted, non-overlapping set of edits against a document of `len_before` chars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    len_before: usize,
    changes: Vec<ChangeSpec>,
}

impl ChangeSet {
    pub fn empty(len: usize) -> Self {
        Self {
            len_before: len,
            changes: Vec::new(),
        }
    }

    pub fn new(len_before: usize, mut changes: Vec<ChangeSpec>) -> Result<Self> {
        changes.sort_by_key(|c| (c.from, c.to));

        let mut prev_end = 0;
        for change in &changes {
            if change.from > change.to || change.to > len_before || change.from < prev_end {
                return Err(Error::InvalidChange {
                    from: change.from,
                    to: change.to,
                    len: len_before,
                });
            }
            prev_end = change.to;
        }

        changes.retain(|c| !c.is_noop());
        Ok(Self {
            len_before,
            changes,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changes(&self) -> &[ChangeSpec] {
        &self.changes
    }

    pub fn len_before(&self) -> usize {
        self.len_before
    }

    pub fn len_after(&self) -> usize {
        let mut len = self.len_before;
        for change in &self.changes {
            len = len - (change.to - change.from) + change.insert.chars().count();
        }
        len
    }

    /// Applies the changes to `rope`, which must hold `len_before` chars.
    pub fn apply(&self, rope: &mut Rope) {
        for change in self.changes.iter().rev() {
            if change.to > change.from {
                rope.remove(change.from..change.to);
            }
            if !change.insert.is_empty() {
                rope.insert(change.from, &change.insert);
            }
        }
    }

    /// The change set that undoes `self`, given the document it was applied to.
    pub fn invert(&self, before: &Rope) -> ChangeSet {
        let mut added = 0;
        let mut removed = 0;
        let mut changes = Vec::with_capacity(self.changes.len());

        for change in &self.changes {
            let from = change.from + added - removed;
            let inserted = change.insert.chars().count();
            changes.push(ChangeSpec {
                from,
                to: from + inserted,
                insert: before.slice(change.from..change.to).to_string(),
            });
            added += inserted;
            removed += change.to - change.from;
        }

        ChangeSet {
            len_before: self.len_after(),
            changes,
        }
    }

    pub fn map_pos(&self, pos: usize, assoc: Assoc) -> usize {
        let mut added = 0;
        let mut removed = 0;

        for change in &self.changes {
            if pos < change.from {
                break;
            }
            let new_from = change.from + added - removed;
            let inserted = change.insert.chars().count();

            if pos <= change.to {
                if change.from == change.to || (pos != change.from && pos != change.to) {
                    return match assoc {
                        Assoc::Before => new_from,
                        Assoc::After => new_from + inserted,
                    };
                }
                return if pos == change.from {
                    new_from
                } else {
                    new_from + inserted
                };
            }

            added += inserted;
            removed += change.to - change.from;
        }

        pos + added - removed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/text.rs"]
mod tests;
