//! Grammar parsing and parallel rewriting.
//!
//! A [`Grammar`] is an axiom plus a table of single-symbol production rules.
//! Symbols without a rule rewrite to themselves. Expansion is bounded by a
//! length cap: once the string grows past it, rewriting stops and the
//! current string is kept.

use std::collections::HashMap;
use std::fmt;

/// Default cap on the expanded string length, in symbols.
pub const DEFAULT_MAX_LENGTH: usize = 1_000_000;

/// An expanded symbol sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LString(Vec<char>);

impl LString {
    /// Symbols in order.
    pub fn as_slice(&self) -> &[char] {
        &self.0
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the string has no symbols.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.0 {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Result of running the expander.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expansion {
    /// The expanded string.
    pub string: LString,
    /// Rewrite passes actually performed.
    pub iterations_run: u32,
    /// True if the length cap cut expansion short.
    pub truncated: bool,
}

/// Axiom plus production rules.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grammar {
    axiom: Vec<char>,
    rules: HashMap<char, Vec<char>>,
}

impl Grammar {
    /// Grammar with the given axiom and no rules.
    pub fn new(axiom: &str) -> Self {
        Self {
            axiom: axiom.chars().collect(),
            rules: HashMap::new(),
        }
    }

    /// Parses newline-separated `SYMBOL=REPLACEMENT` rule lines.
    ///
    /// Each line is split on `=`; the first field is the symbol and the
    /// second its replacement, so anything after a second `=` is dropped.
    /// Lines without `=`, with an empty side, or whose left side is not
    /// exactly one symbol are skipped. A later rule for the same symbol wins.
    pub fn parse(axiom: &str, rules: &str) -> Self {
        let mut grammar = Self::new(axiom);
        for line in rules.lines() {
            let mut fields = line.split('=');
            let (Some(lhs), Some(rhs)) = (fields.next(), fields.next()) else {
                continue;
            };
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if rhs.is_empty() {
                continue;
            }
            let mut chars = lhs.chars();
            match (chars.next(), chars.next()) {
                (Some(symbol), None) => {
                    grammar.rules.insert(symbol, rhs.chars().collect());
                }
                _ => log::debug!("Skipping malformed rule line {line:?}"),
            }
        }
        grammar
    }

    /// Adds or replaces the rule for `symbol`.
    pub fn with_rule(mut self, symbol: char, replacement: &str) -> Self {
        self.rules.insert(symbol, replacement.chars().collect());
        self
    }

    /// The axiom symbols.
    pub fn axiom(&self) -> &[char] {
        &self.axiom
    }

    /// Replacement for `symbol`, if a rule exists.
    pub fn rule(&self, symbol: char) -> Option<&[char]> {
        self.rules.get(&symbol).map(Vec::as_slice)
    }

    /// Number of distinct rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// One parallel rewrite pass over `input`.
    pub fn rewrite(&self, input: &[char]) -> Vec<char> {
        let len = input
            .iter()
            .map(|c| self.rule(*c).map_or(1, <[char]>::len))
            .sum();
        let mut out = Vec::with_capacity(len);
        for &c in input {
            match self.rule(c) {
                Some(rhs) => out.extend_from_slice(rhs),
                None => out.push(c),
            }
        }
        out
    }

    /// Rewrites the axiom `iterations` times, stopping early once the string
    /// exceeds `max_length` symbols.
    pub fn expand(&self, iterations: u32, max_length: usize) -> Expansion {
        let mut current = self.axiom.clone();
        let mut iterations_run = 0;
        let mut truncated = false;

        for i in 0..iterations {
            current = self.rewrite(&current);
            iterations_run += 1;
            if current.len() > max_length {
                truncated = i + 1 < iterations;
                if truncated {
                    log::warn!(
                        "L-system string truncated at {} symbols after {} of {} iterations",
                        current.len(),
                        iterations_run,
                        iterations
                    );
                }
                break;
            }
        }

        Expansion {
            string: LString(current),
            iterations_run,
            truncated,
        }
    }
}
