//! Visualisations: dashboards and reports built on top of datasets.

use super::{ItemBase, ItemBuilder, ItemParts};
use crate::field::Field;
use crate::reference::ItemReference;
use crate::{validation, ConnectorResult};
use serde::{Deserialize, Serialize};

/// Role a field plays in a visualisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualisationFieldType {
    Dimension,
    Measure,
    Other,
}

/// A field shown by a visualisation, with the items it is computed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceVisualisationField {
    field: Field,
    field_type: VisualisationFieldType,
    item_references: Vec<ItemReference>,
}

impl SourceVisualisationField {
    pub fn builder() -> SourceVisualisationFieldBuilder {
        SourceVisualisationFieldBuilder::default()
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn field_type(&self) -> VisualisationFieldType {
        self.field_type
    }

    pub fn item_references(&self) -> &[ItemReference] {
        &self.item_references
    }
}

#[derive(Debug, Clone, Default)]
pub struct SourceVisualisationFieldBuilder {
    field: Option<Field>,
    field_type: Option<VisualisationFieldType>,
    item_references: Option<Vec<ItemReference>>,
}

impl SourceVisualisationFieldBuilder {
    pub fn with_field(mut self, field: Field) -> Self {
        self.field = Some(field);
        self
    }

    pub fn with_field_type(mut self, field_type: VisualisationFieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn with_item_references(
        mut self,
        references: impl IntoIterator<Item = ItemReference>,
    ) -> Self {
        self.item_references
            .get_or_insert_with(Vec::new)
            .extend(references);
        self
    }

    pub fn build(self) -> ConnectorResult<SourceVisualisationField> {
        Ok(SourceVisualisationField {
            field: validation::required("field", self.field)?,
            field_type: validation::required("fieldType", self.field_type)?,
            item_references: validation::required("itemReferences", self.item_references)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceVisualisation {
    base: ItemBase,
    fields: Vec<SourceVisualisationField>,
    linked_dataset: Vec<ItemReference>,
}

impl SourceVisualisation {
    pub fn builder() -> ItemBuilder<VisualisationParts> {
        ItemBuilder::from_parts(VisualisationParts::default())
    }

    pub fn base(&self) -> &ItemBase {
        &self.base
    }

    pub fn fields(&self) -> &[SourceVisualisationField] {
        &self.fields
    }

    /// Datasets the visualisation reads from
    pub fn linked_dataset(&self) -> &[ItemReference] {
        &self.linked_dataset
    }
}

#[derive(Debug, Clone, Default)]
pub struct VisualisationParts {
    fields: Option<Vec<SourceVisualisationField>>,
    linked_dataset: Option<Vec<ItemReference>>,
}

impl ItemBuilder<VisualisationParts> {
    pub fn with_fields(
        mut self,
        fields: impl IntoIterator<Item = SourceVisualisationField>,
    ) -> Self {
        self.parts
            .fields
            .get_or_insert_with(Vec::new)
            .extend(fields);
        self
    }

    pub fn with_linked_dataset(
        mut self,
        references: impl IntoIterator<Item = ItemReference>,
    ) -> Self {
        self.parts
            .linked_dataset
            .get_or_insert_with(Vec::new)
            .extend(references);
        self
    }
}

impl ItemParts for VisualisationParts {
    type Output = SourceVisualisation;

    fn finish(self, base: ItemBase) -> ConnectorResult<SourceVisualisation> {
        Ok(SourceVisualisation {
            base,
            fields: validation::required("fields", self.fields)?,
            linked_dataset: validation::required("linkedDataset", self.linked_dataset)?,
        })
    }
}
