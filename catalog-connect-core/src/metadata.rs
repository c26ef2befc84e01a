//! Metadata definitions declared by a connector.

use crate::property::PropertyType;
use crate::validation;
use crate::ConnectorResult;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Namespace for metadata identifiers.
const METADATA_NAMESPACE: Uuid = Uuid::from_u128(0x5a1e0c7a_9b3f_4d21_8e6a_c0ffee10ba5e);

/// A metadata (property) definition a connector exposes.
///
/// The identifier is derived from the connector id, the code and the type, so the
/// same definition always maps to the same catalog property across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    id: Uuid,
    code: String,
    property_type: PropertyType,
}

impl Metadata {
    pub fn new(
        connector_id: &str,
        code: impl Into<String>,
        property_type: PropertyType,
    ) -> ConnectorResult<Self> {
        let code = code.into();
        validation::non_empty("code", &code)?;
        let id = Self::derive_id(connector_id, &code, property_type);
        Ok(Self {
            id,
            code,
            property_type,
        })
    }

    pub fn string(connector_id: &str, code: impl Into<String>) -> ConnectorResult<Self> {
        Self::new(connector_id, code, PropertyType::String)
    }

    pub fn instant(connector_id: &str, code: impl Into<String>) -> ConnectorResult<Self> {
        Self::new(connector_id, code, PropertyType::Instant)
    }

    pub fn url(connector_id: &str, code: impl Into<String>) -> ConnectorResult<Self> {
        Self::new(connector_id, code, PropertyType::Url)
    }

    pub fn tag(connector_id: &str, code: impl Into<String>) -> ConnectorResult<Self> {
        Self::new(connector_id, code, PropertyType::Tag)
    }

    /// Parts are NUL-separated so that no two distinct triples share a name.
    fn derive_id(connector_id: &str, code: &str, property_type: PropertyType) -> Uuid {
        let name = format!("{}\0{}\0{}", connector_id, code, property_type.as_str());
        Uuid::new_v5(&METADATA_NAMESPACE, name.as_bytes())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }
}

impl PartialEq for Metadata {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Metadata {}

impl Hash for Metadata {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
