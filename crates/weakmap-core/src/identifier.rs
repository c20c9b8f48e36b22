//! Identifier management using string interning for efficient string storage and comparison
//!
//! This module provides the [`Id`] type with an efficient string-interner based approach.
//! Topic ids, and the references other topics make to them, are interned so that
//! resolution and edge bookkeeping compare symbols instead of strings.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Efficient identifier type using string interning
///
/// Topic ids may arrive as strings or integers; both are normalised to their
/// string form before interning, so `Id::from(42_u64)` and `Id::new("42")` are equal.
///
/// # Examples
///
/// ```
/// use weakmap_core::identifier::Id;
///
/// let fractions = Id::new("fractions");
/// let numeric = Id::from(42_u64);
///
/// assert_eq!(fractions, "fractions");
/// assert_eq!(numeric, Id::new("42"));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns the string this identifier was created from.
    pub fn as_string(&self) -> String {
        interner()
            .resolve(self.0)
            .expect("Symbol should exist in interner")
            .to_owned()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.as_string();
        write!(f, "{value}")
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.as_string();
        f.debug_tuple("Id").field(&value).finish()
    }
}

impl std::str::FromStr for Id {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice
    ///
    /// This is a convenience implementation that calls `Id::new`.
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<u64> for Id {
    /// Creates an `Id` from a numeric identifier, compared by its decimal form.
    fn from(value: u64) -> Self {
        Self::new(&value.to_string())
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        interner()
            .resolve(self.0)
            .expect("Symbol should exist in interner")
            == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}

struct IdVisitor;

impl de::Visitor<'_> for IdVisitor {
    type Value = Id;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer identifier")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Id, E> {
        Ok(Id::new(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Id, E> {
        Ok(Id::from(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Id, E> {
        Ok(Id::new(&value.to_string()))
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("fractions");
        let id2 = Id::new("fractions");
        let id3 = Id::new("ratio");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "fractions");
    }

    #[test]
    fn test_numeric_ids_compare_as_strings() {
        assert_eq!(Id::from(7_u64), Id::new("7"));
        assert_ne!(Id::from(7_u64), Id::new("07"));
    }

    #[test]
    fn test_display_and_debug() {
        let id = Id::new("math-15");
        assert_eq!(format!("{id}"), "math-15");
        assert_eq!(format!("{id:?}"), "Id(\"math-15\")");
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let id1 = Id::new("key1");
        let id2 = Id::new("key1");
        let id3 = Id::new("key2");

        let mut map = HashMap::new();
        map.insert(id1, "value1");
        map.insert(id3, "value2");

        assert_eq!(map.get(&id2), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str() {
        let id = Id::new("百分率");

        assert!(id == "百分率");
        assert!(id != "割合");

        let empty = Id::new("");
        assert!(empty == "");
    }

    #[test]
    fn test_deserialize_string_and_integer() {
        let ids: Vec<Id> = serde_json::from_str(r#"["n1", 2, -3]"#).unwrap();
        assert_eq!(ids, vec![Id::new("n1"), Id::new("2"), Id::new("-3")]);
    }

    #[test]
    fn test_deserialize_rejects_other_types() {
        let result: Result<Id, _> = serde_json::from_str("true");
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_as_string() {
        let json = serde_json::to_string(&Id::from(12_u64)).unwrap();
        assert_eq!(json, r#""12""#);
    }
}
