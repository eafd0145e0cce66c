//! Ordered pattern tables that turn native failure text into a [`PackageError`].
//!
//! Each backend keeps its own table in its `errors.rs`; this module only
//! provides the matcher. Rules are tried in order, so specific phrasings must
//! be listed before generic ones. Matching is case-insensitive and per line.

use crate::error::{ErrorKind, Operation, PackageError};
use crate::execution::CommandResult;
use regex::{Captures, Regex, RegexBuilder};

/// One classification rule: a pattern and the kind it maps to.
///
/// A pattern may define a `name` capture group for the package or repository
/// it reports on.
#[derive(Debug)]
pub struct Rule {
    kind: ErrorKind,
    pattern: Regex,
    operations: Vec<Operation>,
}

impl Rule {
    pub fn new(kind: ErrorKind, pattern: &str) -> Self {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("Invalid classifier pattern");
        Self {
            kind,
            pattern,
            operations: Vec::new(),
        }
    }

    /// Restrict the rule to the given operations.
    pub fn only(mut self, operations: &[Operation]) -> Self {
        self.operations = operations.to_vec();
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    fn applies_to(&self, operation: Operation) -> bool {
        self.operations.is_empty() || self.operations.contains(&operation)
    }
}

/// An ordered list of [`Rule`]s.
#[derive(Debug)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Classifier {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Classify a failed command using its combined stderr and stdout.
    pub fn classify(
        &self,
        operation: Operation,
        result: &CommandResult,
        targets: &[String],
    ) -> PackageError {
        self.classify_text(operation, &result.combined_text(), targets)
    }

    /// Classify raw failure text.
    ///
    /// The first matching rule wins. Without a match the operation's generic
    /// kind is used. The whole text is always kept as the cause.
    pub fn classify_text(&self, operation: Operation, text: &str, targets: &[String]) -> PackageError {
        for rule in self.rules.iter().filter(|r| r.applies_to(operation)) {
            for line in text.lines() {
                if let Some(caps) = rule.pattern.captures(line) {
                    let error = PackageError::new(rule.kind, operation).with_cause(text);
                    return match offending_target(&caps, line, targets) {
                        Some(target) => error.with_target(target),
                        None => error,
                    };
                }
            }
        }

        let error = PackageError::new(operation.fallback_kind(), operation).with_cause(text);
        match targets {
            [only] => error.with_target(only.clone()),
            _ => error,
        }
    }
}

/// Pick the attempted name that the failing line talks about.
fn offending_target(caps: &Captures<'_>, line: &str, targets: &[String]) -> Option<String> {
    if let Some(named) = caps.name("name") {
        let named = trim_token(named.as_str());
        if let Some(hit) = targets.iter().find(|t| t.as_str() == named) {
            return Some(hit.clone());
        }
    }

    line.split(|c: char| c.is_whitespace() || c == ',')
        .map(trim_token)
        .find_map(|token| targets.iter().find(|t| t.as_str() == token))
        .cloned()
}

fn trim_token(token: &str) -> &str {
    token.trim_matches(|c: char| {
        matches!(c, '\'' | '"' | '`' | '‘' | '’' | ':' | ',' | '(' | ')' | '[' | ']')
    })
    .trim_end_matches('.')
}
