//! Fields of datasets and visualisations.

use crate::validation;
use crate::ConnectorResult;
use serde::{Deserialize, Serialize};

/// Data type of a source field, as reported by the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    String,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    Date,
    Time,
    Timestamp,
    Binary,
    BigDecimal,
    GeoPoint,
    GeoShape,
    Struct,
    Map,
    Null,
    Unknown,
}

impl DataType {
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Byte | DataType::Short | DataType::Integer | DataType::Long
        )
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer()
            || matches!(self, DataType::Float | DataType::Double | DataType::BigDecimal)
    }

    pub fn is_geo(&self) -> bool {
        matches!(self, DataType::GeoPoint | DataType::GeoShape)
    }

    /// Smallest type able to hold values of every type in `types`.
    ///
    /// Used when a field's type is inferred from heterogeneous samples. `Null` never
    /// widens the result. `Unknown` is ignored unless `transparent_unknown` is set, in
    /// which case it is kept and any mix containing it stays `Unknown`.
    pub fn more_generic(types: &[DataType], transparent_unknown: bool) -> DataType {
        let mut distinct: Vec<DataType> = Vec::new();
        for t in types {
            let skipped =
                *t == DataType::Null || (!transparent_unknown && *t == DataType::Unknown);
            if !skipped && !distinct.contains(t) {
                distinct.push(*t);
            }
        }

        match distinct.as_slice() {
            [] if types.contains(&DataType::Null) => DataType::Null,
            [] => DataType::Unknown,
            [single] => *single,
            many if many.iter().all(DataType::is_integer) => DataType::Long,
            many if many.iter().all(DataType::is_numeric) => DataType::Double,
            many if many.iter().all(DataType::is_geo) => DataType::GeoShape,
            many if !many.contains(&DataType::Unknown) => DataType::Binary,
            _ => DataType::Unknown,
        }
    }
}

/// A named, typed column of a dataset or visualisation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    name: String,
    data_type: DataType,
    native_type: Option<String>,
    native_index: u32,
    keys: Vec<String>,
    nullable: bool,
    multivalued: bool,
    description: Option<String>,
}

impl Field {
    pub fn builder() -> FieldBuilder {
        FieldBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn native_type(&self) -> Option<&str> {
        self.native_type.as_deref()
    }

    pub fn native_index(&self) -> u32 {
        self.native_index
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_multivalued(&self) -> bool {
        self.multivalued
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[derive(Debug, Default, Clone)]
pub struct FieldBuilder {
    name: Option<String>,
    data_type: Option<DataType>,
    native_type: Option<String>,
    native_index: u32,
    keys: Vec<String>,
    nullable: bool,
    multivalued: bool,
    description: Option<String>,
}

impl FieldBuilder {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    pub fn with_native_type(mut self, native_type: impl Into<String>) -> Self {
        self.native_type = Some(native_type.into());
        self
    }

    pub fn with_native_index(mut self, native_index: u32) -> Self {
        self.native_index = native_index;
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.keys.push(key.into());
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn multivalued(mut self, multivalued: bool) -> Self {
        self.multivalued = multivalued;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn build(self) -> ConnectorResult<Field> {
        let name = validation::required_non_empty("name", self.name)?;
        validation::max_length("name", &name, validation::MAX_NAME_LENGTH)?;
        let data_type = validation::required("dataType", self.data_type)?;
        if let Some(description) = &self.description {
            validation::max_length(
                "description",
                description,
                validation::MAX_DESCRIPTION_LENGTH,
            )?;
        }

        Ok(Field {
            name,
            data_type,
            native_type: self.native_type,
            native_index: self.native_index,
            keys: self.keys,
            nullable: self.nullable,
            multivalued: self.multivalued,
            description: self.description,
        })
    }
}
