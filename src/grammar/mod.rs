//! Grammar model and predictive parse table
//!
//! This module turns a declarative grammar description into the data the
//! table-driven parser needs:
//! - [`GrammarModel`]: terminals, nonterminals, productions and their
//!   FIRST / FOLLOW / PREDICT sets
//! - [`sets`]: fixed-point derivation of the sets from the productions
//! - [`table`]: the `(nonterminal, lookahead) -> decision` table with
//!   synchronization entries for panic-mode recovery
//!
//! # Grammar source format
//!
//! ```text
//! // comment
//! Left -> sym sym | sym | ε
//! ```
//!
//! Any right-hand symbol that never appears on a left-hand side is a terminal,
//! `ε` (or `epsilon`) is the empty alternative, and `#name` is an action
//! symbol. The first rule's left-hand side is the start symbol.

pub mod sets;
pub mod table;

use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use thiserror::Error;

pub use table::{Decision, ParseTable, TableConflict};

/// The grammar shipped with the crate.
pub const CMINUS_GRAMMAR: &str = include_str!("cminus.grammar");

/// End-of-input terminal.
pub const END_MARKER: &str = "$";

/// Error raised while reading a grammar description
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("grammar line {line}: expected `Left -> alternatives`")]
    MissingArrow { line: usize },

    #[error("grammar line {line}: empty left-hand side")]
    EmptyLeft { line: usize },

    #[error("grammar line {line}: `{left}` has an empty alternative without `ε`")]
    EmptyAlternative { line: usize, left: String },

    #[error("grammar has no productions")]
    NoProductions,

    #[error("production {production} refers to unknown nonterminal `{name}`")]
    UnknownNonTerminal { production: usize, name: String },
}

/// A grammar symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(String),
    NonTerminal(String),
    /// Semantic action marker; transparent to FIRST/FOLLOW.
    Action(String),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Terminal(name) | Symbol::NonTerminal(name) | Symbol::Action(name) => name,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Action(name) => write!(f, "#{}", name),
            _ => f.write_str(self.name()),
        }
    }
}

/// A production `left -> right` with its predict set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub id: usize,
    pub left: String,
    /// Empty for the ε-production.
    pub right: Vec<Symbol>,
    /// Terminal names selecting this production.
    pub predict: Vec<String>,
}

impl Production {
    pub fn new(id: usize, left: impl Into<String>, right: Vec<Symbol>) -> Self {
        Production {
            id,
            left: left.into(),
            right,
            predict: Vec::new(),
        }
    }

    pub fn with_predict<I, S>(mut self, predict: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predict = predict.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_epsilon(&self) -> bool {
        self.right.is_empty()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.left)?;
        if self.right.is_empty() {
            return write!(f, " ε");
        }
        for symbol in &self.right {
            write!(f, " {}", symbol)?;
        }
        Ok(())
    }
}

/// Terminals, nonterminals, productions and their precomputed sets.
///
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct GrammarModel {
    start: String,
    terminals: Vec<String>,
    nonterminals: Vec<String>,
    productions: Vec<Production>,
    first: FxHashMap<String, Vec<String>>,
    nullable: FxHashSet<String>,
    follow: FxHashMap<String, Vec<String>>,
}

impl GrammarModel {
    /// Builds a model from productions that already carry their predict sets
    /// and from explicit FOLLOW sets.
    ///
    /// Nonterminals are the left-hand sides, in order of first appearance; the
    /// first production's left side is the start symbol. FIRST sets are still
    /// derived, since they are only informational here.
    pub fn new(
        productions: Vec<Production>,
        follow: FxHashMap<String, Vec<String>>,
    ) -> Result<Self, GrammarError> {
        let mut model = Self::skeleton(productions)?;
        let (first, nullable) = sets::first_sets(&model.productions);
        model.first = first;
        model.nullable = nullable;
        model.follow = follow;
        Ok(model)
    }

    /// Reads a grammar description and derives FIRST, FOLLOW and PREDICT.
    pub fn parse(source: &str) -> Result<Self, GrammarError> {
        let productions = parse_rules(source)?;
        let mut model = Self::skeleton(productions)?;

        let (first, nullable) = sets::first_sets(&model.productions);
        let follow = sets::follow_sets(&model.start, &model.productions, &first, &nullable);
        sets::assign_predict_sets(&mut model.productions, &first, &nullable, &follow);

        model.first = first;
        model.nullable = nullable;
        model.follow = follow;
        log::debug!(
            "grammar loaded: {} productions, {} nonterminals, {} terminals",
            model.productions.len(),
            model.nonterminals.len(),
            model.terminals.len()
        );
        Ok(model)
    }

    /// The built-in C-minus grammar.
    pub fn cminus() -> Result<Self, GrammarError> {
        Self::parse(CMINUS_GRAMMAR)
    }

    fn skeleton(productions: Vec<Production>) -> Result<Self, GrammarError> {
        let start = productions
            .first()
            .map(|p| p.left.clone())
            .ok_or(GrammarError::NoProductions)?;

        let mut nonterminals: Vec<String> = Vec::new();
        for production in &productions {
            if !nonterminals.contains(&production.left) {
                nonterminals.push(production.left.clone());
            }
        }

        let mut terminals: Vec<String> = Vec::new();
        for production in &productions {
            for symbol in &production.right {
                match symbol {
                    Symbol::Terminal(name) => {
                        if !terminals.contains(name) {
                            terminals.push(name.clone());
                        }
                    }
                    Symbol::NonTerminal(name) => {
                        if !nonterminals.contains(name) {
                            return Err(GrammarError::UnknownNonTerminal {
                                production: production.id,
                                name: name.clone(),
                            });
                        }
                    }
                    Symbol::Action(_) => {}
                }
            }
        }
        if !terminals.iter().any(|t| t == END_MARKER) {
            terminals.push(END_MARKER.to_string());
        }

        Ok(GrammarModel {
            start,
            terminals,
            nonterminals,
            productions,
            first: FxHashMap::default(),
            nullable: FxHashSet::default(),
            follow: FxHashMap::default(),
        })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn terminals(&self) -> &[String] {
        &self.terminals
    }

    pub fn nonterminals(&self) -> &[String] {
        &self.nonterminals
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn is_terminal(&self, name: &str) -> bool {
        self.terminals.iter().any(|t| t == name)
    }

    pub fn is_nonterminal(&self, name: &str) -> bool {
        self.nonterminals.iter().any(|nt| nt == name)
    }

    /// FIRST set of a symbol name; a terminal's FIRST set is itself.
    pub fn first(&self, name: &str) -> Vec<String> {
        if self.is_terminal(name) {
            return vec![name.to_string()];
        }
        self.first.get(name).cloned().unwrap_or_default()
    }

    pub fn is_nullable(&self, nonterminal: &str) -> bool {
        self.nullable.contains(nonterminal)
    }

    /// FOLLOW set of a nonterminal, in derivation order.
    pub fn follow(&self, nonterminal: &str) -> &[String] {
        self.follow
            .get(nonterminal)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Splits the textual grammar into numbered productions.
fn parse_rules(source: &str) -> Result<Vec<Production>, GrammarError> {
    let mut raw: Vec<(usize, String, Vec<Vec<String>>)> = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        let (left, right) = line
            .split_once("->")
            .ok_or(GrammarError::MissingArrow { line: line_no })?;
        let left = left.trim();
        if left.is_empty() {
            return Err(GrammarError::EmptyLeft { line: line_no });
        }

        let mut alternatives = Vec::new();
        for alternative in right.split('|') {
            let symbols: Vec<String> = alternative.split_whitespace().map(str::to_string).collect();
            if symbols.is_empty() {
                return Err(GrammarError::EmptyAlternative {
                    line: line_no,
                    left: left.to_string(),
                });
            }
            alternatives.push(symbols);
        }
        raw.push((line_no, left.to_string(), alternatives));
    }

    let lefts: FxHashSet<&str> = raw.iter().map(|(_, left, _)| left.as_str()).collect();

    let mut productions = Vec::new();
    for (_, left, alternatives) in &raw {
        for alternative in alternatives {
            let right = alternative
                .iter()
                .filter(|s| !is_epsilon(s))
                .map(|s| {
                    if let Some(action) = s.strip_prefix('#').filter(|a| !a.is_empty()) {
                        Symbol::Action(action.to_string())
                    } else if lefts.contains(s.as_str()) {
                        Symbol::NonTerminal(s.clone())
                    } else {
                        Symbol::Terminal(s.clone())
                    }
                })
                .collect();
            productions.push(Production::new(productions.len(), left.clone(), right));
        }
    }

    Ok(productions)
}

fn is_epsilon(symbol: &str) -> bool {
    symbol == "ε" || symbol.eq_ignore_ascii_case("epsilon")
}
