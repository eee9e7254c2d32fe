use crate::{
    events::{Attributes, LogEvent, TagId},
    matchers::{Matcher, MatcherError},
};
use log::debug;
use std::{collections::HashMap, fmt::Debug, hash::Hash};

/// A collection of identified matcher trees searched together with a single event.
///
/// Rules are validated when inserted; once built, the set is only read and can be shared
/// between threads.
pub struct MatcherSet<K> {
    by_ids: HashMap<K, usize>,
    rules: Vec<(K, Matcher)>,
}

impl<K> MatcherSet<K>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self {
            by_ids: HashMap::new(),
            rules: vec![],
        }
    }

    pub fn insert(&mut self, id: K, matcher: Matcher) -> Result<(), MatcherError> {
        if self.by_ids.contains_key(&id) {
            return Err(MatcherError::AlreadyPresent(format!("{id:?}")));
        }
        matcher.validate()?;

        self.by_ids.insert(id.clone(), self.rules.len());
        self.rules.push((id, matcher));
        Ok(())
    }

    pub fn get(&self, id: &K) -> Option<&Matcher> {
        self.by_ids.get(id).map(|index| &self.rules[*index].1)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluates every rule and reports the ids of those matching, in insertion order.
    pub fn search(&self, tag: TagId, attributes: &Attributes) -> Report<K> {
        let matches: Vec<_> = self
            .rules
            .iter()
            .filter(|(_, matcher)| matcher.matches(tag, attributes))
            .map(|(id, _)| id.clone())
            .collect();
        debug!(
            "MatcherSet search - tag [{}] matched {} of {} rules",
            tag,
            matches.len(),
            self.rules.len()
        );
        Report { matches }
    }

    #[inline]
    pub fn search_event(&self, event: &LogEvent) -> Report<K> {
        self.search(event.tag, &event.attributes)
    }
}

impl<K> Default for MatcherSet<K>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report<K> {
    matches: Vec<K>,
}

impl<K: PartialEq> Report<K> {
    pub fn matches(&self) -> &[K] {
        &self.matches
    }

    pub fn contains(&self, id: &K) -> bool {
        self.matches.contains(id)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
