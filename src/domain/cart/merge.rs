//! Duplicate line merging
//!
//! Lines of one user that share an option fingerprint collapse into the
//! earliest of them, carrying the summed quantity. A duplicate that would
//! push the survivor past [`MAX_LINE_QUANTITY`] is kept as its own line and
//! becomes the survivor for later duplicates.

use std::collections::{BTreeSet, HashMap};

use super::model::{CartLine, OptionFingerprint, MAX_LINE_QUANTITY};

/// Result of [`merge_duplicates`].
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Surviving lines, oldest first.
    pub lines: Vec<CartLine>,
    /// Ids of lines folded into a survivor.
    pub absorbed: Vec<String>,
    /// Survivor id and its new quantity, only for survivors that grew.
    pub updated: Vec<(String, i32)>,
    /// Quantity every active input line held before merging. Writes are
    /// conditional on it so a concurrent increment is never overwritten.
    pub observed: HashMap<String, i32>,
}

impl MergeOutcome {
    pub fn is_noop(&self) -> bool {
        self.absorbed.is_empty()
    }
}

/// Merge active lines with identical `(user, fingerprint)`.
///
/// Checked-out lines are passed through untouched.
pub fn merge_duplicates(mut lines: Vec<CartLine>) -> MergeOutcome {
    lines.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    let mut survivors: HashMap<(String, OptionFingerprint), usize> = HashMap::new();
    let mut grew = BTreeSet::new();
    let mut kept: Vec<CartLine> = Vec::with_capacity(lines.len());
    let mut absorbed = Vec::new();
    let mut observed = HashMap::new();

    for line in lines {
        if !line.is_active() {
            kept.push(line);
            continue;
        }
        observed.insert(line.id.clone(), line.quantity);
        let key = (line.user_id.clone(), line.fingerprint());
        match survivors.get(&key) {
            Some(&idx) if kept[idx].quantity + line.quantity <= MAX_LINE_QUANTITY => {
                kept[idx].quantity += line.quantity;
                grew.insert(idx);
                absorbed.push(line.id);
            }
            _ => {
                survivors.insert(key, kept.len());
                kept.push(line);
            }
        }
    }

    let updated = grew
        .into_iter()
        .map(|idx| (kept[idx].id.clone(), kept[idx].quantity))
        .collect();

    MergeOutcome {
        lines: kept,
        absorbed,
        updated,
        observed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::{CartLineStatus, CupSize, DrinkOptions, Ice};
    use chrono::{Duration, Utc};

    fn line(id: &str, user: &str, product: &str, options: DrinkOptions, qty: i32, age: i64) -> CartLine {
        let at = Utc::now() - Duration::seconds(age);
        CartLine {
            id: id.to_string(),
            user_id: user.to_string(),
            product_id: product.to_string(),
            options,
            quantity: qty,
            status: CartLineStatus::Active,
            order_id: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn identical_lines_collapse_into_oldest_with_summed_quantity() {
        let opts = DrinkOptions::default();
        let outcome = merge_duplicates(vec![
            line("b", "u1", "p1", opts, 2, 10),
            line("a", "u1", "p1", opts, 3, 20),
        ]);

        assert_eq!(outcome.lines.len(), 1);
        assert_eq!(outcome.lines[0].id, "a");
        assert_eq!(outcome.lines[0].quantity, 5);
        assert_eq!(outcome.absorbed, vec!["b".to_string()]);
        assert_eq!(outcome.updated, vec![("a".to_string(), 5)]);
    }

    #[test]
    fn different_options_stay_separate() {
        let regular = DrinkOptions::default();
        let big = DrinkOptions {
            size: CupSize::Big,
            ..regular
        };
        let less_ice = DrinkOptions {
            ice: Ice::Less,
            ..regular
        };
        let outcome = merge_duplicates(vec![
            line("a", "u1", "p1", regular, 1, 30),
            line("b", "u1", "p1", big, 1, 20),
            line("c", "u1", "p1", less_ice, 1, 10),
            line("d", "u1", "p2", regular, 1, 5),
        ]);

        assert!(outcome.is_noop());
        assert_eq!(outcome.lines.len(), 4);
        assert!(outcome.updated.is_empty());
    }

    #[test]
    fn lines_of_different_users_never_merge() {
        let opts = DrinkOptions::default();
        let outcome = merge_duplicates(vec![
            line("a", "u1", "p1", opts, 1, 10),
            line("b", "u2", "p1", opts, 1, 5),
        ]);
        assert!(outcome.is_noop());
    }

    #[test]
    fn checked_out_lines_are_left_alone() {
        let opts = DrinkOptions::default();
        let mut consumed = line("a", "u1", "p1", opts, 4, 30);
        consumed.status = CartLineStatus::CheckedOut;
        let outcome = merge_duplicates(vec![consumed, line("b", "u1", "p1", opts, 1, 10)]);

        assert!(outcome.is_noop());
        assert_eq!(outcome.lines.iter().map(|l| l.quantity).sum::<i32>(), 5);
    }

    #[test]
    fn three_way_merge_sums_everything() {
        let opts = DrinkOptions {
            sugar: 50,
            ..Default::default()
        };
        let outcome = merge_duplicates(vec![
            line("a", "u1", "p1", opts, 1, 30),
            line("b", "u1", "p1", opts, 2, 20),
            line("c", "u1", "p1", opts, 3, 10),
        ]);
        assert_eq!(outcome.lines.len(), 1);
        assert_eq!(outcome.lines[0].quantity, 6);
        assert_eq!(outcome.absorbed.len(), 2);
    }

    #[test]
    fn merge_never_exceeds_line_cap() {
        let opts = DrinkOptions::default();
        let outcome = merge_duplicates(vec![
            line("a", "u1", "p1", opts, 60, 30),
            line("b", "u1", "p1", opts, 50, 20),
            line("c", "u1", "p1", opts, 40, 10),
        ]);

        let quantities: Vec<_> = outcome.lines.iter().map(|l| (l.id.as_str(), l.quantity)).collect();
        assert_eq!(quantities, vec![("a", 60), ("b", 90)]);
        assert_eq!(outcome.absorbed, vec!["c".to_string()]);
        assert_eq!(outcome.updated, vec![("b".to_string(), 90)]);
        assert_eq!(outcome.observed.get("b"), Some(&50));
        assert_eq!(outcome.observed.len(), 3);
    }
}
