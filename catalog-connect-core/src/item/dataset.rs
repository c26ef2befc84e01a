//! Datasets: tables, files and other structured collections of fields.

use super::{ItemBase, ItemBuilder, ItemParts};
use crate::field::Field;
use crate::{validation, ConnectorError, ConnectorResult};

/// A reference from fields of a dataset to fields of another dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignKey {
    name: String,
    target_dataset: String,
    source_fields: Vec<String>,
    target_fields: Vec<String>,
}

impl ForeignKey {
    /// Source and target fields are paired by position, so both lists must be the
    /// same, non-zero, length.
    pub fn new(
        name: impl Into<String>,
        target_dataset: impl Into<String>,
        source_fields: impl IntoIterator<Item = impl Into<String>>,
        target_fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> ConnectorResult<Self> {
        let name = name.into();
        let target_dataset = target_dataset.into();
        let source_fields: Vec<String> = source_fields.into_iter().map(Into::into).collect();
        let target_fields: Vec<String> = target_fields.into_iter().map(Into::into).collect();

        validation::non_empty("name", &name)?;
        validation::non_empty("targetDataset", &target_dataset)?;
        validation::non_empty_list("sourceFields", &source_fields)?;
        if source_fields.len() != target_fields.len() {
            return Err(ConnectorError::config(format!(
                "Foreign key \"{}\" maps {} source fields to {} target fields",
                name,
                source_fields.len(),
                target_fields.len()
            )));
        }

        Ok(Self {
            name,
            target_dataset,
            source_fields,
            target_fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the referenced dataset
    pub fn target_dataset(&self) -> &str {
        &self.target_dataset
    }

    pub fn source_fields(&self) -> &[String] {
        &self.source_fields
    }

    pub fn target_fields(&self) -> &[String] {
        &self.target_fields
    }
}

/// A column the dataset is partitioned on, with the source's partitioning scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partitioning {
    column: String,
    partition_type: String,
}

impl Partitioning {
    pub fn builder() -> PartitioningBuilder {
        PartitioningBuilder::default()
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Scheme as named by the source, e.g. `RANGE` or `HASH`
    pub fn partition_type(&self) -> &str {
        &self.partition_type
    }
}

#[derive(Debug, Clone, Default)]
pub struct PartitioningBuilder {
    column: Option<String>,
    partition_type: Option<String>,
}

impl PartitioningBuilder {
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_partition_type(mut self, partition_type: impl Into<String>) -> Self {
        self.partition_type = Some(partition_type.into());
        self
    }

    pub fn build(self) -> ConnectorResult<Partitioning> {
        Ok(Partitioning {
            column: validation::required_non_empty("column", self.column)?,
            partition_type: validation::required_non_empty("partitionType", self.partition_type)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceDataset {
    base: ItemBase,
    fields: Vec<Field>,
    primary_keys: Vec<String>,
    foreign_keys: Vec<ForeignKey>,
    partitions: Vec<Partitioning>,
}

impl SourceDataset {
    pub fn builder() -> ItemBuilder<DatasetParts> {
        ItemBuilder::from_parts(DatasetParts::default())
    }

    pub fn base(&self) -> &ItemBase {
        &self.base
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Names of the fields forming the primary key
    pub fn primary_keys(&self) -> &[String] {
        &self.primary_keys
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    pub fn partitions(&self) -> &[Partitioning] {
        &self.partitions
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DatasetParts {
    fields: Option<Vec<Field>>,
    primary_keys: Vec<String>,
    foreign_keys: Vec<ForeignKey>,
    partitions: Vec<Partitioning>,
}

impl ItemBuilder<DatasetParts> {
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.parts
            .fields
            .get_or_insert_with(Vec::new)
            .extend(fields);
        self
    }

    pub fn with_primary_key(mut self, field_name: impl Into<String>) -> Self {
        self.parts.primary_keys.push(field_name.into());
        self
    }

    pub fn with_foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.parts.foreign_keys.push(foreign_key);
        self
    }

    pub fn with_partitioning(mut self, partitioning: Partitioning) -> Self {
        self.parts.partitions.push(partitioning);
        self
    }
}

fn check_field(fields: &[Field], name: &str, role: &str, dataset: &str) -> ConnectorResult<()> {
    if fields.iter().any(|f| f.name() == name) {
        Ok(())
    } else {
        Err(ConnectorError::config(format!(
            "{} \"{}\" does not name a field of dataset \"{}\"",
            role, name, dataset
        )))
    }
}

impl ItemParts for DatasetParts {
    type Output = SourceDataset;

    fn finish(self, base: ItemBase) -> ConnectorResult<SourceDataset> {
        let fields = validation::required("fields", self.fields)?;
        for key in &self.primary_keys {
            check_field(&fields, key, "Primary key", base.id())?;
        }
        for foreign_key in &self.foreign_keys {
            for source in foreign_key.source_fields() {
                check_field(&fields, source, "Foreign key field", base.id())?;
            }
        }
        for partitioning in &self.partitions {
            check_field(&fields, partitioning.column(), "Partition column", base.id())?;
        }

        Ok(SourceDataset {
            base,
            fields,
            primary_keys: self.primary_keys,
            foreign_keys: self.foreign_keys,
            partitions: self.partitions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::DataType;

    fn field(name: &str, data_type: DataType) -> Field {
        Field::builder()
            .with_name(name)
            .with_data_type(data_type)
            .build()
            .unwrap()
    }

    #[test]
    fn test_dataset() {
        let dataset = SourceDataset::builder()
            .with_id("music/artists")
            .with_name("artists")
            .with_fields([field("id", DataType::Long), field("name", DataType::String)])
            .with_primary_key("id")
            .build()
            .unwrap();

        assert_eq!(dataset.fields().len(), 2);
        assert_eq!(dataset.primary_keys(), ["id"]);
        assert_eq!(dataset.field("name").map(Field::data_type), Some(DataType::String));
    }

    #[test]
    fn test_fields_required() {
        let err = SourceDataset::builder()
            .with_id("music/artists")
            .with_name("artists")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("\"fields\""));
    }

    #[test]
    fn test_primary_key_must_name_field() {
        let err = SourceDataset::builder()
            .with_id("music/artists")
            .with_name("artists")
            .with_fields([field("id", DataType::Long)])
            .with_primary_key("uuid")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("uuid"));
    }

    #[test]
    fn test_foreign_keys_and_partitions() {
        let dataset = SourceDataset::builder()
            .with_id("music/albums")
            .with_name("albums")
            .with_fields([
                field("id", DataType::Long),
                field("artist_id", DataType::Long),
                field("released", DataType::Date),
            ])
            .with_foreign_key(
                ForeignKey::new("fk_artist", "music/artists", ["artist_id"], ["id"]).unwrap(),
            )
            .with_partitioning(
                Partitioning::builder()
                    .with_column("released")
                    .with_partition_type("RANGE")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let fk = &dataset.foreign_keys()[0];
        assert_eq!(fk.name(), "fk_artist");
        assert_eq!(fk.target_dataset(), "music/artists");
        assert_eq!(fk.source_fields(), ["artist_id"]);
        assert_eq!(fk.target_fields(), ["id"]);
        assert_eq!(dataset.partitions()[0].column(), "released");
        assert_eq!(dataset.partitions()[0].partition_type(), "RANGE");
    }

    #[test]
    fn test_foreign_key_fields_must_pair_up() {
        let err = ForeignKey::new("fk", "music/artists", ["a", "b"], ["id"]).unwrap_err();
        assert!(err.is_configuration());
        let none: Vec<String> = Vec::new();
        assert!(ForeignKey::new("fk", "music/artists", none.clone(), none).is_err());
        assert!(ForeignKey::new("", "music/artists", ["a"], ["id"]).is_err());
    }

    #[test]
    fn test_foreign_key_and_partition_must_name_fields() {
        let fk_err = SourceDataset::builder()
            .with_id("music/albums")
            .with_name("albums")
            .with_fields([field("id", DataType::Long)])
            .with_foreign_key(ForeignKey::new("fk", "music/artists", ["artist"], ["id"]).unwrap())
            .build()
            .unwrap_err();
        assert!(fk_err.to_string().contains("artist"));

        let partition_err = SourceDataset::builder()
            .with_id("music/albums")
            .with_name("albums")
            .with_fields([field("id", DataType::Long)])
            .with_partitioning(
                Partitioning::builder()
                    .with_column("year")
                    .with_partition_type("HASH")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap_err();
        assert!(partition_err.to_string().contains("year"));
    }

    #[test]
    fn test_partitioning_requires_column_and_type() {
        assert!(Partitioning::builder().with_column("year").build().is_err());
        assert!(Partitioning::builder()
            .with_column("")
            .with_partition_type("HASH")
            .build()
            .is_err());
    }
}
