//! FIRST / FOLLOW / PREDICT derivation
//!
//! All three are computed by fixed-point iteration over the productions. Sets
//! are kept as ordered vectors so that table construction, and therefore
//! conflict resolution, is deterministic.

use super::{Production, Symbol, END_MARKER};
use rustc_hash::{FxHashMap, FxHashSet};

fn insert_unique(set: &mut Vec<String>, item: &str) -> bool {
    if set.iter().any(|s| s == item) {
        false
    } else {
        set.push(item.to_string());
        true
    }
}

/// FIRST set of a symbol sequence, and whether the whole sequence is nullable.
pub fn sequence_first(
    symbols: &[Symbol],
    first: &FxHashMap<String, Vec<String>>,
    nullable: &FxHashSet<String>,
) -> (Vec<String>, bool) {
    let mut result = Vec::new();
    for symbol in symbols {
        match symbol {
            Symbol::Terminal(name) => {
                insert_unique(&mut result, name);
                return (result, false);
            }
            Symbol::NonTerminal(name) => {
                if let Some(set) = first.get(name) {
                    for t in set {
                        insert_unique(&mut result, t);
                    }
                }
                if !nullable.contains(name) {
                    return (result, false);
                }
            }
            Symbol::Action(_) => {}
        }
    }
    (result, true)
}

/// FIRST sets of every nonterminal plus the set of nullable nonterminals.
pub fn first_sets(productions: &[Production]) -> (FxHashMap<String, Vec<String>>, FxHashSet<String>) {
    let mut first: FxHashMap<String, Vec<String>> = productions
        .iter()
        .map(|p| (p.left.clone(), Vec::new()))
        .collect();
    let mut nullable = FxHashSet::default();

    let mut change = true;
    while change {
        change = false;
        for production in productions {
            let (seq_first, seq_nullable) = sequence_first(&production.right, &first, &nullable);
            let entry = first.entry(production.left.clone()).or_default();
            for t in &seq_first {
                change |= insert_unique(entry, t);
            }
            if seq_nullable {
                change |= nullable.insert(production.left.clone());
            }
        }
    }

    (first, nullable)
}

/// FOLLOW sets of every nonterminal. FOLLOW(start) is seeded with `$`.
pub fn follow_sets(
    start: &str,
    productions: &[Production],
    first: &FxHashMap<String, Vec<String>>,
    nullable: &FxHashSet<String>,
) -> FxHashMap<String, Vec<String>> {
    let mut follow: FxHashMap<String, Vec<String>> = productions
        .iter()
        .map(|p| (p.left.clone(), Vec::new()))
        .collect();
    if let Some(set) = follow.get_mut(start) {
        insert_unique(set, END_MARKER);
    }

    let mut change = true;
    while change {
        change = false;
        for production in productions {
            for (i, symbol) in production.right.iter().enumerate() {
                let Symbol::NonTerminal(name) = symbol else {
                    continue;
                };
                let (mut trail, suffix_nullable) =
                    sequence_first(&production.right[i + 1..], first, nullable);
                if suffix_nullable {
                    if let Some(left_follow) = follow.get(&production.left) {
                        trail.extend(left_follow.iter().cloned());
                    }
                }
                let entry = follow.entry(name.clone()).or_default();
                for t in &trail {
                    change |= insert_unique(entry, t);
                }
            }
        }
    }

    follow
}

/// Fills in each production's predict set.
///
/// Alternatives are ordered: a terminal already predicted by an earlier
/// alternative of the same nonterminal is not predicted again.
pub fn assign_predict_sets(
    productions: &mut [Production],
    first: &FxHashMap<String, Vec<String>>,
    nullable: &FxHashSet<String>,
    follow: &FxHashMap<String, Vec<String>>,
) {
    let mut claimed: FxHashMap<String, Vec<String>> = FxHashMap::default();

    for production in productions.iter_mut() {
        let (mut candidates, seq_nullable) = sequence_first(&production.right, first, nullable);
        if seq_nullable {
            if let Some(left_follow) = follow.get(&production.left) {
                for t in left_follow {
                    insert_unique(&mut candidates, t);
                }
            }
        }

        let taken = claimed.entry(production.left.clone()).or_default();
        let mut predict = Vec::with_capacity(candidates.len());
        for t in candidates {
            if taken.contains(&t) {
                log::debug!("predict: `{}` already selects an earlier alternative of {}, dropped from [{}]", t, production.left, production);
                continue;
            }
            taken.push(t.clone());
            predict.push(t);
        }
        production.predict = predict;
    }
}
