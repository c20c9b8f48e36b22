//! Curriculum topic records.
//!
//! A [`Topic`] is the unit the weakness map lays out: one curriculum concept
//! with references to the topics that must be mastered before it
//! (`prerequisites`) and the topics that build on it (`dependencies`).
//!
//! Records are usually deserialized from JSON produced by the surrounding
//! application. The decoder is lenient in the ways real data sources are
//! inconsistent:
//!
//! - ids may be strings or integers and are always compared as strings;
//! - reference lists may be arrays or a single `;`-separated string;
//! - mastery may be an integer or a float and is clamped to `0..=100`;
//! - unknown fields are ignored.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::{identifier::Id, mastery::MasteryBand};

/// A single curriculum topic.
///
/// # Examples
///
/// ```
/// use weakmap_core::topic::Topic;
///
/// let ratio = Topic::new("ratio", "割合")
///     .with_prerequisites(["fractions"])
///     .with_mastery(65);
///
/// assert_eq!(ratio.id(), "ratio");
/// assert_eq!(ratio.prerequisites().len(), 1);
/// assert_eq!(ratio.mastery(), Some(65));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    id: Id,
    name: String,
    #[serde(default, deserialize_with = "deserialize_references")]
    prerequisites: Vec<Id>,
    #[serde(default, deserialize_with = "deserialize_references")]
    dependencies: Vec<Id>,
    #[serde(
        default,
        deserialize_with = "deserialize_mastery",
        skip_serializing_if = "Option::is_none"
    )]
    mastery: Option<u8>,
    #[serde(
        default,
        alias = "attempts",
        alias = "question_count",
        skip_serializing_if = "Option::is_none"
    )]
    question_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    domain: Option<String>,
}

impl Topic {
    /// Creates a topic with no references, score or grouping keys.
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            prerequisites: Vec::new(),
            dependencies: Vec::new(),
            mastery: None,
            question_count: None,
            subject: None,
            domain: None,
        }
    }

    /// Sets the prerequisite references (ids or names).
    pub fn with_prerequisites<I, R>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Id>,
    {
        self.prerequisites = references.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the dependency references (ids or names).
    pub fn with_dependencies<I, R>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Id>,
    {
        self.dependencies = references.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the mastery score, clamped to `0..=100`.
    pub fn with_mastery(mut self, mastery: u8) -> Self {
        self.mastery = Some(mastery.min(100));
        self
    }

    pub fn with_question_count(mut self, count: u32) -> Self {
        self.question_count = Some(count);
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// References to topics that must be mastered before this one.
    pub fn prerequisites(&self) -> &[Id] {
        &self.prerequisites
    }

    /// References to topics that build on this one.
    pub fn dependencies(&self) -> &[Id] {
        &self.dependencies
    }

    pub fn mastery(&self) -> Option<u8> {
        self.mastery
    }

    /// The mastery band used to color this topic.
    pub fn band(&self) -> MasteryBand {
        MasteryBand::from_mastery(self.mastery)
    }

    pub fn question_count(&self) -> Option<u32> {
        self.question_count
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

struct ReferencesVisitor;

impl<'de> de::Visitor<'de> for ReferencesVisitor {
    type Value = Vec<Id>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of topic references or a `;`-separated string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(value
            .split(';')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(Id::new)
            .collect())
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut references = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(reference) = seq.next_element::<Id>()? {
            references.push(reference);
        }
        Ok(references)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }
}

fn deserialize_references<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Id>, D::Error> {
    deserializer.deserialize_any(ReferencesVisitor)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMastery {
    Integer(i64),
    Float(f64),
}

fn deserialize_mastery<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    let raw = Option::<RawMastery>::deserialize(deserializer)?;
    Ok(raw.map(|raw| match raw {
        RawMastery::Integer(value) => value.clamp(0, 100) as u8,
        RawMastery::Float(value) => value.round().clamp(0.0, 100.0) as u8,
    }))
}
