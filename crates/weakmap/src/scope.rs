//! Subject and domain filtering.
//!
//! Topics carry optional `subject` and `domain` keys that the layout core
//! never interprets. [`TopicScope`] narrows a topic list to one subject and,
//! optionally, one domain before the graph is built, so each map shows a
//! single area of the curriculum.

use weakmap_core::topic::Topic;

/// A subject/domain filter. The default scope keeps every topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TopicScope {
    subject: Option<String>,
    domain: Option<String>,
}

impl TopicScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn is_unscoped(&self) -> bool {
        self.subject.is_none() && self.domain.is_none()
    }

    /// Whether `topic` falls inside this scope.
    ///
    /// A topic without a subject (or domain) only matches a scope that does
    /// not filter on that key.
    pub fn contains(&self, topic: &Topic) -> bool {
        let matches = |wanted: Option<&str>, actual: Option<&str>| match wanted {
            Some(wanted) => actual == Some(wanted),
            None => true,
        };
        matches(self.subject(), topic.subject()) && matches(self.domain(), topic.domain())
    }

    /// The topics inside this scope, in input order.
    pub fn apply(&self, topics: &[Topic]) -> Vec<Topic> {
        topics
            .iter()
            .filter(|topic| self.contains(topic))
            .cloned()
            .collect()
    }
}

/// Distinct subjects in first-seen order.
pub fn subjects(topics: &[Topic]) -> Vec<&str> {
    distinct(topics.iter().filter_map(Topic::subject))
}

/// Distinct domains of `subject` (or of all topics) in first-seen order.
pub fn domains<'a>(topics: &'a [Topic], subject: Option<&str>) -> Vec<&'a str> {
    distinct(
        topics
            .iter()
            .filter(|topic| subject.is_none() || topic.subject() == subject)
            .filter_map(Topic::domain),
    )
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
