//! # Line Diff
//!
//! Computes which quote lines changed between two versions of a quote so
//! the store only writes the delta.
//!
//! ```text
//! previous: [A, B, C]        current: [A, C', D]
//!
//! added   = [(2, D)]
//! changed = [(1, C')]        (content or position differs)
//! removed = ["B"]
//! ```

use std::collections::HashMap;

use crate::types::{QuoteLineItem, QuoteServiceLine};

/// A quote line with a stable id.
pub trait QuoteLine: PartialEq {
    fn line_id(&self) -> &str;
}

impl QuoteLine for QuoteLineItem {
    fn line_id(&self) -> &str {
        &self.id
    }
}

impl QuoteLine for QuoteServiceLine {
    fn line_id(&self) -> &str {
        &self.id
    }
}

/// Delta between two line lists. Positions are indices in the current list.
#[derive(Debug, PartialEq)]
pub struct LineChanges<'a, T> {
    pub added: Vec<(usize, &'a T)>,
    pub changed: Vec<(usize, &'a T)>,
    pub removed: Vec<String>,
}

impl<'a, T: QuoteLine> LineChanges<'a, T> {
    /// Compares `previous` against `current` by line id.
    pub fn between(previous: &[T], current: &'a [T]) -> Self {
        let before: HashMap<&str, (usize, &T)> = previous
            .iter()
            .enumerate()
            .map(|(i, line)| (line.line_id(), (i, line)))
            .collect();

        let mut added = Vec::new();
        let mut changed = Vec::new();
        for (position, line) in current.iter().enumerate() {
            match before.get(line.line_id()) {
                None => added.push((position, line)),
                Some((old_position, old)) if *old_position != position || *old != line => {
                    changed.push((position, line))
                }
                Some(_) => {}
            }
        }

        let kept: Vec<&str> = current.iter().map(QuoteLine::line_id).collect();
        let removed = previous
            .iter()
            .map(QuoteLine::line_id)
            .filter(|id| !kept.contains(id))
            .map(str::to_string)
            .collect();

        LineChanges {
            added,
            changed,
            removed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }

    /// Lines that must be written (added or changed), with their positions.
    pub fn upserts(&self) -> impl Iterator<Item = (usize, &'a T)> + '_ {
        self.added.iter().chain(self.changed.iter()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, quantity: f64) -> QuoteServiceLine {
        QuoteServiceLine {
            id: id.to_string(),
            service_id: "s-1".to_string(),
            name: "Limpeza".to_string(),
            unit_price: 100.0,
            quantity,
            price: 100.0 * quantity,
        }
    }

    #[test]
    fn test_no_changes() {
        let lines = vec![line("a", 1.0), line("b", 2.0)];
        let copy = lines.clone();
        assert!(LineChanges::between(&lines, &copy).is_empty());
    }

    #[test]
    fn test_added_changed_removed() {
        let previous = vec![line("a", 1.0), line("b", 1.0), line("c", 1.0)];
        let current = vec![line("a", 1.0), line("c", 3.0), line("d", 1.0)];

        let changes = LineChanges::between(&previous, &current);
        assert_eq!(changes.added, vec![(2, &current[2])]);
        assert_eq!(changes.changed, vec![(1, &current[1])]);
        assert_eq!(changes.removed, vec!["b".to_string()]);
        assert_eq!(changes.upserts().count(), 2);
    }

    #[test]
    fn test_position_shift_counts_as_change() {
        let previous = vec![line("a", 1.0), line("b", 1.0)];
        let current = vec![line("b", 1.0)];

        let changes = LineChanges::between(&previous, &current);
        assert!(changes.added.is_empty());
        assert_eq!(changes.changed, vec![(0, &current[0])]);
        assert_eq!(changes.removed, vec!["a".to_string()]);
    }

    #[test]
    fn test_everything_removed() {
        let previous = vec![line("a", 1.0)];
        let changes = LineChanges::between(&previous, &[]);
        assert_eq!(changes.removed, vec!["a".to_string()]);
    }
}
