//! Table-driven predictive parser with panic-mode recovery
//!
//! [`PredictiveParser`] runs the classic LL(1) stack automaton over a
//! [`ParseTable`], growing a concrete [`ParseTree`] as it expands productions.
//!
//! # Recovery
//!
//! - A terminal that does not match the lookahead is reported as missing and
//!   dropped without consuming input.
//! - A nonterminal with no entry for the lookahead discards tokens (each one
//!   reported as illegal) until an entry exists. A `Synchronize` entry then
//!   reports the nonterminal as missing and drops it, leaving the lookahead for
//!   the enclosing construct.
//! - If the source runs dry mid-parse, the remaining stack is dropped silently.
//!
//! Every step either expands, drops a node or consumes a token, and the end
//! marker always synchronizes, so parsing terminates on any input.

use super::errors::SyntaxError;
use super::lexer::{Token, TokenSource};
use super::tree::{NodeId, NodeLabel, ParseTree};
use crate::grammar::{Decision, ParseTable, Production, Symbol};

/// Everything a parse run produces
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub tree: ParseTree,
    pub errors: Vec<SyntaxError>,
    /// Non-trivia tokens consumed, ending with an EOF sentinel. Empty unless
    /// trace capture was enabled.
    pub trace: Vec<Token>,
    pub tokens_consumed: usize,
}

/// Lookahead over a token source that skips trivia.
struct Cursor<S> {
    source: S,
    current: Token,
    consumed: usize,
    trace: Option<Vec<Token>>,
}

impl<S: TokenSource> Cursor<S> {
    fn new(source: S, capture: bool) -> Self {
        Cursor {
            source,
            current: Token::eof(0),
            consumed: 0,
            trace: capture.then(Vec::new),
        }
    }

    /// Moves to the next significant token; `false` once the source is exhausted.
    fn advance(&mut self) -> bool {
        while let Some(token) = self.source.next_token() {
            if token.kind.is_trivia() {
                log::trace!("skipping {} {:?} at line {}", token.kind, token.lexeme, token.line);
                continue;
            }
            self.consumed += 1;
            if let Some(trace) = self.trace.as_mut() {
                trace.push(token.clone());
            }
            self.current = token;
            return true;
        }
        false
    }

    fn key(&self) -> &str {
        self.current.match_key()
    }

    fn line(&self) -> usize {
        self.current.line
    }

    fn into_trace(self) -> Vec<Token> {
        let Some(mut trace) = self.trace else {
            return Vec::new();
        };
        if !trace.last().is_some_and(Token::is_eof) {
            let line = trace.last().map_or(self.current.line, |t| t.line);
            trace.push(Token::eof(line));
        }
        trace
    }
}

/// LL(1) driver over a prebuilt table
pub struct PredictiveParser<'t> {
    table: &'t ParseTable,
    capture_trace: bool,
}

impl<'t> PredictiveParser<'t> {
    pub fn new(table: &'t ParseTable) -> Self {
        PredictiveParser {
            table,
            capture_trace: false,
        }
    }

    /// Record the consumed tokens for a later pass.
    pub fn with_trace(mut self, capture: bool) -> Self {
        self.capture_trace = capture;
        self
    }

    pub fn parse<S: TokenSource>(&self, source: S) -> ParseOutcome {
        self.parse_with_actions(source, |_, _| {})
    }

    /// Parses, invoking `on_action` with the name of each action symbol and
    /// the lookahead at the moment it is reached.
    pub fn parse_with_actions<S, F>(&self, source: S, mut on_action: F) -> ParseOutcome
    where
        S: TokenSource,
        F: FnMut(&str, &Token),
    {
        let mut tree = ParseTree::new(Symbol::NonTerminal(self.table.start().to_string()));
        let mut errors = Vec::new();
        let mut cursor = Cursor::new(source, self.capture_trace);

        if !cursor.advance() {
            log::debug!("token source was empty");
            return ParseOutcome {
                tree,
                errors,
                trace: cursor.into_trace(),
                tokens_consumed: 0,
            };
        }

        let mut stack = vec![tree.root()];
        let mut exhausted = false;

        while let Some(node) = stack.pop() {
            let NodeLabel::Symbol(symbol) = tree.node(node).label.clone() else {
                continue;
            };
            log::trace!("top {} lookahead {:?}", symbol, cursor.key());

            match symbol {
                Symbol::Terminal(name) => {
                    if name == cursor.key() {
                        tree.attach_token(node, cursor.current.clone());
                        if !stack.is_empty() && !cursor.advance() {
                            exhausted = true;
                        }
                    } else {
                        log::debug!("missing terminal {} at line {}", name, cursor.line());
                        errors.push(SyntaxError::missing(cursor.line(), name));
                        tree.detach(node);
                    }
                }
                Symbol::NonTerminal(name) => loop {
                    match self.table.lookup(&name, cursor.key()) {
                        Decision::Expand(production) => {
                            expand(&mut tree, &mut stack, node, production);
                            break;
                        }
                        Decision::Synchronize => {
                            log::debug!("synchronizing {} on {:?}", name, cursor.key());
                            errors.push(SyntaxError::missing(cursor.line(), name));
                            tree.detach(node);
                            break;
                        }
                        Decision::Error => {
                            let error = if cursor.current.is_eof() {
                                SyntaxError::unexpected_eof(cursor.line())
                            } else {
                                SyntaxError::illegal(cursor.line(), cursor.current.to_string())
                            };
                            log::debug!("discarding {:?} while expanding {}", cursor.key(), name);
                            errors.push(error);
                            if !cursor.advance() {
                                tree.detach(node);
                                exhausted = true;
                                break;
                            }
                        }
                    }
                },
                Symbol::Action(name) => {
                    on_action(&name, &cursor.current);
                    tree.detach(node);
                }
            }

            if exhausted {
                log::debug!("token source exhausted with {} symbols pending", stack.len());
                for pending in stack.drain(..) {
                    tree.detach(pending);
                }
                break;
            }
        }

        if !exhausted && !cursor.current.is_eof() {
            errors.push(SyntaxError::unexpected(cursor.line(), cursor.current.to_string()));
        }

        let tokens_consumed = cursor.consumed;
        ParseOutcome {
            tree,
            errors,
            trace: cursor.into_trace(),
            tokens_consumed,
        }
    }
}

/// Hangs the production's symbols under `node` and pushes them right to left.
fn expand(tree: &mut ParseTree, stack: &mut Vec<NodeId>, node: NodeId, production: &Production) {
    if production.is_epsilon() {
        tree.add_child(node, NodeLabel::Epsilon);
        return;
    }
    let children: Vec<NodeId> = production
        .right
        .iter()
        .map(|symbol| tree.add_child(node, NodeLabel::Symbol(symbol.clone())))
        .collect();
    stack.extend(children.into_iter().rev());
}
