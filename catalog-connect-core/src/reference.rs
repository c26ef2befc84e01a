//! Identifiers and cross-item references.

use crate::validation;
use crate::ConnectorResult;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// One key/value pair of an item identifier, e.g. `schema = "music"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentificationProperty {
    key: String,
    value: String,
}

impl IdentificationProperty {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> ConnectorResult<Self> {
        let key = key.into();
        let value = value.into();
        validation::non_empty("key", &key)?;
        validation::non_empty("value", &value)?;
        Ok(Self { key, value })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Identifies an item within a connection as an ordered list of properties.
///
/// Serializes as a JSON object whose keys keep the identifier order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemIdentifier {
    properties: Vec<IdentificationProperty>,
}

impl ItemIdentifier {
    pub fn new(properties: Vec<IdentificationProperty>) -> ConnectorResult<Self> {
        validation::non_empty_list("identificationProperties", &properties)?;
        Ok(Self { properties })
    }

    /// Build from `(key, value)` pairs.
    pub fn from_pairs<'a, I>(pairs: I) -> ConnectorResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let properties = pairs
            .into_iter()
            .map(|(k, v)| IdentificationProperty::new(k, v))
            .collect::<ConnectorResult<Vec<_>>>()?;
        Self::new(properties)
    }

    pub fn properties(&self) -> &[IdentificationProperty] {
        &self.properties
    }

    /// Value of the first property with the given key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// New identifier with `property` placed first
    pub fn with_prefix(&self, property: IdentificationProperty) -> Self {
        let mut properties = Vec::with_capacity(self.properties.len() + 1);
        properties.push(property);
        properties.extend(self.properties.iter().cloned());
        Self { properties }
    }

    /// New identifier with `property` placed last
    pub fn with_suffix(&self, property: IdentificationProperty) -> Self {
        let mut properties = self.properties.clone();
        properties.push(property);
        Self { properties }
    }
}

impl fmt::Display for ItemIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for p in &self.properties {
            if !first {
                f.write_str("/")?;
            }
            write!(f, "{}={}", p.key, p.value)?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for ItemIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.properties.len()))?;
        for p in &self.properties {
            map.serialize_entry(&p.key, &p.value)?;
        }
        map.end()
    }
}

/// Reference to another item, possibly owned by a different connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemReference {
    identifier: ItemIdentifier,
    connection_alias: Option<String>,
}

impl ItemReference {
    /// Reference an item of the same connection
    pub fn new(identifier: ItemIdentifier) -> Self {
        Self {
            identifier,
            connection_alias: None,
        }
    }

    /// Reference an item owned by the connection known under `alias`
    pub fn with_connection_alias(mut self, alias: impl Into<String>) -> Self {
        self.connection_alias = Some(alias.into());
        self
    }

    pub fn identifier(&self) -> &ItemIdentifier {
        &self.identifier
    }

    pub fn connection_alias(&self) -> Option<&str> {
        self.connection_alias.as_deref()
    }
}

/// An entry of a connection inventory: where an item lives and how to display its path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemInventory {
    identifier: ItemIdentifier,
    label_path: Vec<String>,
}

impl ItemInventory {
    pub fn new<I, S>(identifier: ItemIdentifier, label_path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identifier,
            label_path: label_path.into_iter().map(Into::into).collect(),
        }
    }

    pub fn identifier(&self) -> &ItemIdentifier {
        &self.identifier
    }

    pub fn label_path(&self) -> &[String] {
        &self.label_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_id() -> ItemIdentifier {
        ItemIdentifier::from_pairs([("schema", "music"), ("table", "artists")]).unwrap()
    }

    #[test]
    fn test_identification_property_rejects_empty() {
        assert!(IdentificationProperty::new("", "x").is_err());
        assert!(IdentificationProperty::new("x", "").is_err());
    }

    #[test]
    fn test_identifier_requires_properties() {
        let err = ItemIdentifier::new(vec![]).unwrap_err();
        assert!(err.to_string().contains("identificationProperties"));
    }

    #[test]
    fn test_prefix_and_suffix() {
        let id = table_id();
        let db = IdentificationProperty::new("database", "catalog_db").unwrap();
        let field = IdentificationProperty::new("field", "name").unwrap();

        let prefixed = id.with_prefix(db);
        assert_eq!(prefixed.properties()[0].key(), "database");
        assert_eq!(prefixed.properties().len(), 3);

        let suffixed = id.with_suffix(field);
        assert_eq!(suffixed.properties()[2].key(), "field");
        assert_eq!(suffixed.get("field"), Some("name"));
        // receiver untouched
        assert_eq!(id.properties().len(), 2);
    }

    #[test]
    fn test_identifier_serializes_in_order() {
        let json = serde_json::to_string(&table_id()).unwrap();
        assert_eq!(json, r#"{"schema":"music","table":"artists"}"#);
    }

    #[test]
    fn test_display() {
        assert_eq!(table_id().to_string(), "schema=music/table=artists");
    }

    #[test]
    fn test_reference_alias() {
        let reference = ItemReference::new(table_id()).with_connection_alias("warehouse");
        assert_eq!(reference.connection_alias(), Some("warehouse"));
        assert_eq!(reference.identifier(), &table_id());
    }

    #[test]
    fn test_inventory() {
        let inventory = ItemInventory::new(table_id(), ["music", "artists"]);
        assert_eq!(inventory.label_path(), ["music", "artists"]);
    }
}
