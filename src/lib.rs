//! Declarative matching of telemetry log events.
//!
//! A rule is a tree of [`Matcher`]s. Leaves are [`SimpleMatcher`]s that accept a set of event
//! tags and require every one of their [`Predicate`]s to hold against the event's typed
//! [`Attributes`]. Interior nodes are [`CombinationMatcher`]s applying a [`LogicalOperation`]
//! to the results of their children.
//!
//! ```
//! use log_entry_matcher::{Attributes, KeyId, Matcher, Predicate, SimpleMatcher, TagId};
//!
//! const WAKELOCK: TagId = TagId(10);
//! const STATE: KeyId = KeyId(1);
//!
//! let rule = Matcher::not(
//!     SimpleMatcher::new([WAKELOCK])
//!         .with_predicate(Predicate::eq_int(STATE, 0))
//!         .into(),
//! );
//! rule.validate().unwrap();
//!
//! assert!(rule.matches(WAKELOCK, &Attributes::new().with_integer(STATE, 1)));
//! ```
mod events;
mod matcher_set;
mod matchers;
mod predicates;

pub use crate::events::{Attributes, KeyId, LogEvent, TagId};
pub use crate::matcher_set::{MatcherSet, Report};
pub use crate::matchers::{
    CombinationMatcher, LogicalOperation, Matcher, MatcherError, SimpleMatcher, MAX_DEPTH,
};
pub use crate::predicates::{AttributeKind, Comparison, Predicate};
