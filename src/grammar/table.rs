//! Predictive parse table
//!
//! Built in two passes over a [`GrammarModel`]: predict entries first, then
//! `Synchronize` entries for every FOLLOW terminal left unassigned. Keys that
//! are still absent resolve to [`Decision::Error`].

use super::{GrammarModel, Production};
use rustc_hash::FxHashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Production(usize),
    Synchronize,
}

/// Result of a table lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision<'a> {
    Expand(&'a Production),
    Synchronize,
    Error,
}

/// Two productions claiming the same `(nonterminal, terminal)` cell.
///
/// The production registered first wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConflict {
    pub nonterminal: String,
    pub terminal: String,
    pub kept: usize,
    pub dropped: usize,
}

impl fmt::Display for TableConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "conflict at ({}, {}): kept production {}, dropped production {}",
            self.nonterminal, self.terminal, self.kept, self.dropped
        )
    }
}

/// Immutable `(nonterminal, lookahead) -> decision` map.
#[derive(Debug, Clone)]
pub struct ParseTable {
    start: String,
    productions: Vec<Production>,
    entries: FxHashMap<String, FxHashMap<String, Entry>>,
    conflicts: Vec<TableConflict>,
}

impl ParseTable {
    pub fn build(grammar: &GrammarModel) -> Self {
        let productions = grammar.productions().to_vec();
        let mut entries: FxHashMap<String, FxHashMap<String, Entry>> = FxHashMap::default();
        let mut conflicts = Vec::new();

        for (index, production) in productions.iter().enumerate() {
            let row = entries.entry(production.left.clone()).or_default();
            for terminal in &production.predict {
                match row.get(terminal) {
                    Some(Entry::Production(kept)) => {
                        let conflict = TableConflict {
                            nonterminal: production.left.clone(),
                            terminal: terminal.clone(),
                            kept: productions[*kept].id,
                            dropped: production.id,
                        };
                        log::warn!("parse table {}", conflict);
                        conflicts.push(conflict);
                    }
                    _ => {
                        row.insert(terminal.clone(), Entry::Production(index));
                    }
                }
            }
        }

        let mut synchronize = 0;
        for nonterminal in grammar.nonterminals() {
            let row = entries.entry(nonterminal.clone()).or_default();
            for terminal in grammar.follow(nonterminal) {
                if !row.contains_key(terminal) {
                    row.insert(terminal.clone(), Entry::Synchronize);
                    synchronize += 1;
                }
            }
        }

        log::debug!(
            "parse table built: {} predict entries, {} synchronize entries, {} conflicts",
            entries.values().map(|row| row.len()).sum::<usize>() - synchronize,
            synchronize,
            conflicts.len()
        );

        ParseTable {
            start: grammar.start().to_string(),
            productions,
            entries,
            conflicts,
        }
    }

    /// Start symbol of the grammar the table was built from.
    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn lookup(&self, nonterminal: &str, terminal: &str) -> Decision<'_> {
        match self.entries.get(nonterminal).and_then(|row| row.get(terminal)) {
            Some(Entry::Production(index)) => Decision::Expand(&self.productions[*index]),
            Some(Entry::Synchronize) => Decision::Synchronize,
            None => Decision::Error,
        }
    }

    pub fn conflicts(&self) -> &[TableConflict] {
        &self.conflicts
    }
}
