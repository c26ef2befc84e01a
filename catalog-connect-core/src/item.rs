//! Catalog items emitted by connectors.
//!
//! Every item shares an [`ItemBase`] (identity, name, description, metadata, contacts,
//! update time) and adds variant-specific data on top. Items are assembled with an
//! [`ItemBuilder`], parameterised by the variant's parts, whose `build()` validates the
//! shared fields first and the variant's own required fields second:
//!
//! ```rust
//! use catalog_connect_core::{Metadata, PropertyValue, SourceCustomItem};
//!
//! let genre = Metadata::string("movies", "genre").unwrap();
//! let item = SourceCustomItem::builder()
//!     .with_id("movie/42")
//!     .with_name("Brazil")
//!     .with_code("movie")
//!     .with_metadata(&genre, PropertyValue::string("satire"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(item.code(), "movie");
//! ```

mod business_term;
mod custom;
mod dataset;
mod visualisation;

pub use business_term::{BusinessTermParts, SourceBusinessTerm};
pub use custom::{CustomItemParts, SourceCustomItem};
pub use dataset::{
    DatasetParts, ForeignKey, Partitioning, PartitioningBuilder, SourceDataset,
};
pub use visualisation::{
    SourceVisualisation, SourceVisualisationField, SourceVisualisationFieldBuilder,
    VisualisationFieldType, VisualisationParts,
};

use crate::contact::ContactRelation;
use crate::metadata::Metadata;
use crate::property::{PropertyType, PropertyValue};
use crate::validation::{self, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH};
use crate::{ConnectorError, ConnectorResult};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Fields common to every item variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemBase {
    id: String,
    name: String,
    description: Option<String>,
    update_time: Option<DateTime<Utc>>,
    metadata: BTreeMap<String, PropertyValue>,
    contact_relations: Vec<ContactRelation>,
}

impl ItemBase {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn update_time(&self) -> Option<DateTime<Utc>> {
        self.update_time
    }

    /// Metadata values keyed by metadata code
    pub fn metadata(&self) -> &BTreeMap<String, PropertyValue> {
        &self.metadata
    }

    pub fn metadata_value(&self, code: &str) -> Option<&PropertyValue> {
        self.metadata.get(code)
    }

    pub fn contact_relations(&self) -> &[ContactRelation] {
        &self.contact_relations
    }
}

/// Variant-specific half of an [`ItemBuilder`].
pub trait ItemParts {
    type Output;

    /// Check the variant's own fields and assemble the final item.
    fn finish(self, base: ItemBase) -> ConnectorResult<Self::Output>;
}

/// Builder shared by all item variants.
#[derive(Debug, Clone)]
pub struct ItemBuilder<P> {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    update_time: Option<DateTime<Utc>>,
    metadata: BTreeMap<String, (PropertyType, PropertyValue)>,
    contact_relations: Vec<ContactRelation>,
    pub(crate) parts: P,
}

impl<P: ItemParts> ItemBuilder<P> {
    pub(crate) fn from_parts(parts: P) -> Self {
        Self {
            id: None,
            name: None,
            description: None,
            update_time: None,
            metadata: BTreeMap::new(),
            contact_relations: Vec::new(),
            parts,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_update_time(mut self, update_time: DateTime<Utc>) -> Self {
        self.update_time = Some(update_time);
        self
    }

    /// Attach a metadata value; a later value for the same code replaces the earlier one.
    pub fn with_metadata(mut self, metadata: &Metadata, value: impl Into<PropertyValue>) -> Self {
        self.metadata.insert(
            metadata.code().to_string(),
            (metadata.property_type(), value.into()),
        );
        self
    }

    pub fn with_contact_relation(mut self, relation: ContactRelation) -> Self {
        self.contact_relations.push(relation);
        self
    }

    pub fn with_contact_relations(
        mut self,
        relations: impl IntoIterator<Item = ContactRelation>,
    ) -> Self {
        self.contact_relations.extend(relations);
        self
    }

    /// Validate and build the item.
    ///
    /// Shared fields are checked before the variant's own fields.
    pub fn build(self) -> ConnectorResult<P::Output> {
        let id_hint = self.id.clone().unwrap_or_default();
        let result = self
            .into_base()
            .and_then(|(base, parts)| parts.finish(base));

        if let Err(e) = &result {
            debug!(item_id = %id_hint, error = %e, "Rejected item");
        }
        result
    }

    fn into_base(self) -> ConnectorResult<(ItemBase, P)> {
        let name = validation::required_non_empty("name", self.name)?;
        validation::max_length("name", &name, MAX_NAME_LENGTH)?;
        let id = validation::required_non_empty("id", self.id)?;
        validation::max_length("id", &id, MAX_NAME_LENGTH)?;
        if let Some(description) = &self.description {
            validation::max_length("description", description, MAX_DESCRIPTION_LENGTH)?;
        }

        let mut metadata = BTreeMap::new();
        for (code, (expected, value)) in self.metadata {
            if value.property_type() != expected {
                return Err(ConnectorError::config(format!(
                    "Metadata \"{}\" expects a {} value but got {}",
                    code,
                    expected,
                    value.property_type()
                )));
            }
            metadata.insert(code, value);
        }

        let base = ItemBase {
            id,
            name,
            description: self.description,
            update_time: self.update_time,
            metadata,
            contact_relations: self.contact_relations,
        };
        Ok((base, self.parts))
    }
}

/// Any item a connector can emit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceItem {
    Dataset(SourceDataset),
    BusinessTerm(SourceBusinessTerm),
    CustomItem(SourceCustomItem),
    Visualisation(SourceVisualisation),
}

impl SourceItem {
    pub fn base(&self) -> &ItemBase {
        match self {
            SourceItem::Dataset(item) => item.base(),
            SourceItem::BusinessTerm(item) => item.base(),
            SourceItem::CustomItem(item) => item.base(),
            SourceItem::Visualisation(item) => item.base(),
        }
    }

    pub fn id(&self) -> &str {
        self.base().id()
    }

    pub fn name(&self) -> &str {
        self.base().name()
    }

    /// Short variant name, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            SourceItem::Dataset(_) => "dataset",
            SourceItem::BusinessTerm(_) => "business_term",
            SourceItem::CustomItem(_) => "custom_item",
            SourceItem::Visualisation(_) => "visualisation",
        }
    }
}

impl From<SourceDataset> for SourceItem {
    fn from(item: SourceDataset) -> Self {
        SourceItem::Dataset(item)
    }
}

impl From<SourceBusinessTerm> for SourceItem {
    fn from(item: SourceBusinessTerm) -> Self {
        SourceItem::BusinessTerm(item)
    }
}

impl From<SourceCustomItem> for SourceItem {
    fn from(item: SourceCustomItem) -> Self {
        SourceItem::CustomItem(item)
    }
}

impl From<SourceVisualisation> for SourceItem {
    fn from(item: SourceVisualisation) -> Self {
        SourceItem::Visualisation(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn term() -> ItemBuilder<BusinessTermParts> {
        SourceBusinessTerm::builder().with_id("term-1").with_name("Revenue")
    }

    #[test]
    fn test_getters_return_supplied_values() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let owner = ContactRelation::builder()
            .with_role("owner")
            .with_email("owner@example.com")
            .build()
            .unwrap();
        let tags = Metadata::tag("glossary", "tags").unwrap();

        let item = term()
            .with_description("Money in")
            .with_update_time(at)
            .with_metadata(&tags, PropertyValue::tag(["finance"]))
            .with_contact_relation(owner.clone())
            .build()
            .unwrap();

        let base = item.base();
        assert_eq!(base.id(), "term-1");
        assert_eq!(base.name(), "Revenue");
        assert_eq!(base.description(), Some("Money in"));
        assert_eq!(base.update_time(), Some(at));
        assert_eq!(
            base.metadata_value("tags"),
            Some(&PropertyValue::tag(["finance"]))
        );
        assert_eq!(base.contact_relations(), &[owner]);
    }

    #[test]
    fn test_bounds_accepted_at_limit() {
        let item = SourceBusinessTerm::builder()
            .with_id("i".repeat(MAX_NAME_LENGTH))
            .with_name("n".repeat(MAX_NAME_LENGTH))
            .with_description("d".repeat(MAX_DESCRIPTION_LENGTH))
            .build()
            .unwrap();
        assert_eq!(item.base().name().len(), MAX_NAME_LENGTH);
    }

    #[test]
    fn test_bounds_rejected_one_over() {
        let err = term()
            .with_name("n".repeat(MAX_NAME_LENGTH + 1))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::Validation { ref attribute, max_length: 1024 } if attribute == "name"
        ));

        let err = term()
            .with_id("i".repeat(MAX_NAME_LENGTH + 1))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConnectorError::Validation { ref attribute, .. } if attribute == "id"));

        let err = term()
            .with_description("d".repeat(MAX_DESCRIPTION_LENGTH + 1))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::Validation { ref attribute, max_length: 32768 } if attribute == "description"
        ));
    }

    #[test]
    fn test_missing_and_empty_fields() {
        let err = SourceBusinessTerm::builder()
            .with_id("x")
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("\"name\""));

        let err = SourceBusinessTerm::builder()
            .with_name("x")
            .with_id("")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("\"id\" cannot be empty"));
    }

    #[test]
    fn test_metadata_keys_unique_last_wins() {
        let genre = Metadata::string("movies", "genre").unwrap();
        let item = term()
            .with_metadata(&genre, PropertyValue::string("drama"))
            .with_metadata(&genre, PropertyValue::string("comedy"))
            .build()
            .unwrap();

        assert_eq!(item.base().metadata().len(), 1);
        assert_eq!(
            item.base().metadata_value("genre").and_then(|v| v.as_string()),
            Some("comedy")
        );
    }

    #[test]
    fn test_metadata_type_mismatch_rejected() {
        let released = Metadata::instant("movies", "released").unwrap();
        let err = term()
            .with_metadata(&released, PropertyValue::string("yesterday"))
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("released"));
    }

    #[test]
    fn test_source_item_dispatch() {
        let item: SourceItem = term().build().unwrap().into();
        assert_eq!(item.id(), "term-1");
        assert_eq!(item.name(), "Revenue");
        assert_eq!(item.kind(), "business_term");
    }
}
