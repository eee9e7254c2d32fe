use crate::{
    events::{Attributes, KeyId, LogEvent, TagId},
    predicates::Predicate,
};
use itertools::Itertools;
use log::warn;
use std::{collections::BTreeSet, fmt};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum nesting accepted by [`Matcher::validate`].
///
/// Evaluation recurses once per level, so deeper trees are refused when the rules are loaded.
pub const MAX_DEPTH: usize = 32;

#[derive(Error, PartialEq, Debug)]
pub enum MatcherError {
    #[error("a NOT combination needs exactly one child, found {children}")]
    InvalidNotArity { children: usize },
    #[error("{operation} combination has no children")]
    EmptyCombination { operation: LogicalOperation },
    #[error("comparison on {key} uses NaN as operand")]
    NanOperand { key: KeyId },
    #[error("matcher nesting depth is {depth}, but maximum allowed is {max}")]
    DepthExceeded { depth: usize, max: usize },
    #[error("matcher {0} has already been defined")]
    AlreadyPresent(String),
}

/// A node of a matcher tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum Matcher {
    Simple(SimpleMatcher),
    Combination(CombinationMatcher),
}

impl Matcher {
    pub fn and(matchers: Vec<Matcher>) -> Self {
        CombinationMatcher::new(LogicalOperation::And, matchers).into()
    }

    pub fn or(matchers: Vec<Matcher>) -> Self {
        CombinationMatcher::new(LogicalOperation::Or, matchers).into()
    }

    pub fn not(matcher: Matcher) -> Self {
        CombinationMatcher::new(LogicalOperation::Not, vec![matcher]).into()
    }

    pub fn nand(matchers: Vec<Matcher>) -> Self {
        CombinationMatcher::new(LogicalOperation::Nand, matchers).into()
    }

    pub fn nor(matchers: Vec<Matcher>) -> Self {
        CombinationMatcher::new(LogicalOperation::Nor, matchers).into()
    }

    /// Whether an event with the given tag and attributes satisfies this tree.
    #[inline]
    pub fn matches(&self, tag: TagId, attributes: &Attributes) -> bool {
        match self {
            Self::Simple(simple) => simple.matches(tag, attributes),
            Self::Combination(combination) => combination.matches(tag, attributes),
        }
    }

    #[inline]
    pub fn matches_event(&self, event: &LogEvent) -> bool {
        self.matches(event.tag, &event.attributes)
    }

    /// Number of levels in the tree; a simple matcher has a depth of 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::Simple(_) => 1,
            Self::Combination(combination) => {
                1 + combination
                    .matchers
                    .iter()
                    .map(Matcher::depth)
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    /// Checks the structural rules evaluation relies on.
    ///
    /// Meant to run once, when the rules are loaded. Evaluation never calls it and instead
    /// treats a malformed node as non-matching.
    pub fn validate(&self) -> Result<(), MatcherError> {
        let depth = self.depth();
        if depth > MAX_DEPTH {
            return Err(MatcherError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }
        self.validate_node()
    }

    fn validate_node(&self) -> Result<(), MatcherError> {
        match self {
            Self::Simple(simple) => simple.validate(),
            Self::Combination(combination) => combination.validate(),
        }
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Simple(_))
    }

    pub fn is_combination(&self) -> bool {
        matches!(self, Self::Combination(_))
    }
}

impl From<SimpleMatcher> for Matcher {
    fn from(matcher: SimpleMatcher) -> Self {
        Self::Simple(matcher)
    }
}

impl From<CombinationMatcher> for Matcher {
    fn from(matcher: CombinationMatcher) -> Self {
        Self::Combination(matcher)
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(simple) => fmt::Display::fmt(simple, f),
            Self::Combination(combination) => fmt::Display::fmt(combination, f),
        }
    }
}

/// Leaf of a matcher tree: the event tag must be allowed and every predicate must hold.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(deny_unknown_fields))]
pub struct SimpleMatcher {
    tags: BTreeSet<TagId>,
    #[cfg_attr(feature = "serde", serde(default))]
    predicates: Vec<Predicate>,
}

impl SimpleMatcher {
    pub fn new<I>(tags: I) -> Self
    where
        I: IntoIterator<Item = TagId>,
    {
        Self {
            tags: tags.into_iter().collect(),
            predicates: vec![],
        }
    }

    pub fn with_tag(mut self, tag: TagId) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Appends a predicate and hands it back so its comparison can still be changed.
    pub fn add_predicate(&mut self, predicate: Predicate) -> &mut Predicate {
        self.predicates.push(predicate);
        let last = self.predicates.len() - 1;
        &mut self.predicates[last]
    }

    pub fn tags(&self) -> &BTreeSet<TagId> {
        &self.tags
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches(&self, tag: TagId, attributes: &Attributes) -> bool {
        if !self.tags.contains(&tag) {
            return false;
        }

        self.predicates
            .iter()
            .all(|predicate| predicate.evaluate(attributes))
    }

    fn validate(&self) -> Result<(), MatcherError> {
        for predicate in &self.predicates {
            if let Some(operand) = predicate.comparison().float_operand() {
                if operand.is_nan() {
                    return Err(MatcherError::NanOperand {
                        key: predicate.key(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for SimpleMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag in {{{}}}", self.tags.iter().join(", "))?;
        for predicate in &self.predicates {
            write!(f, " and {predicate}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum LogicalOperation {
    And,
    Or,
    Not,
    Nand,
    Nor,
}

impl fmt::Display for LogicalOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Nand => "NAND",
            Self::Nor => "NOR",
        };
        f.write_str(name)
    }
}

/// Interior node of a matcher tree: a logical operation over the results of its children.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(deny_unknown_fields))]
pub struct CombinationMatcher {
    operation: LogicalOperation,
    matchers: Vec<Matcher>,
}

impl CombinationMatcher {
    pub fn new(operation: LogicalOperation, matchers: Vec<Matcher>) -> Self {
        Self {
            operation,
            matchers,
        }
    }

    pub fn with_matcher(mut self, matcher: impl Into<Matcher>) -> Self {
        self.matchers.push(matcher.into());
        self
    }

    pub fn operation(&self) -> LogicalOperation {
        self.operation
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    /// Combines the results of the children, evaluated in order.
    ///
    /// A node that breaks the arity rules checked by [`Matcher::validate`] does not match and
    /// is reported through `log`.
    pub fn matches(&self, tag: TagId, attributes: &Attributes) -> bool {
        let matchers = &self.matchers;
        if matchers.is_empty() {
            warn!(
                "{} combination without children treated as non-matching",
                self.operation
            );
            return false;
        }

        let mut results = matchers.iter().map(|matcher| matcher.matches(tag, attributes));
        match self.operation {
            LogicalOperation::And => results.all(|matched| matched),
            LogicalOperation::Or => results.any(|matched| matched),
            LogicalOperation::Nand => !results.all(|matched| matched),
            LogicalOperation::Nor => !results.any(|matched| matched),
            LogicalOperation::Not => match matchers.as_slice() {
                [matcher] => !matcher.matches(tag, attributes),
                _ => {
                    warn!(
                        "NOT combination with {} children treated as non-matching: {self}",
                        matchers.len()
                    );
                    false
                }
            },
        }
    }

    fn validate(&self) -> Result<(), MatcherError> {
        let children = self.matchers.len();
        if self.operation == LogicalOperation::Not {
            if children != 1 {
                return Err(MatcherError::InvalidNotArity { children });
            }
        } else if children == 0 {
            return Err(MatcherError::EmptyCombination {
                operation: self.operation,
            });
        }

        self.matchers.iter().try_for_each(Matcher::validate_node)
    }
}

impl fmt::Display for CombinationMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            self.operation,
            self.matchers.iter().join(", ")
        )
    }
}
