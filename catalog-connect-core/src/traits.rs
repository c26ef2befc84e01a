//! Connector and connection traits.
//!
//! A [`ConnectorFactory`] opens [`Connection`]s from a [`ConnectionConfig`]. Every
//! connection describes its data sources and declared metadata; what it can actually do
//! is expressed by the capability traits ([`SynchronizeConnection`],
//! [`InventoryConnection`], [`DataSamplingConnection`]), which the host discovers through
//! the `as_*` accessors on [`Connection`].

use crate::config::ConnectionConfig;
use crate::metadata::Metadata;
use crate::reference::ItemIdentifier;
use crate::result::{InventoryResult, SynchronizeResult};
use crate::sample::DataSample;
use crate::validation;
use crate::ConnectorResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Main kind of item a connector imports.
///
/// Connectors may still emit items of other kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectorType {
    DataProduct,
    DataProcess,
    #[default]
    Dataset,
    Visualisation,
}

/// A system a connection reads from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataSource {
    identifier: ItemIdentifier,
    name: String,
}

impl DataSource {
    pub fn new(identifier: ItemIdentifier, name: impl Into<String>) -> ConnectorResult<Self> {
        let name = name.into();
        validation::non_empty("name", &name)?;
        Ok(Self { identifier, name })
    }

    pub fn identifier(&self) -> &ItemIdentifier {
        &self.identifier
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An open connection to a source system.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Systems this connection reads from.
    fn data_sources(&self) -> Vec<DataSource>;

    /// Metadata the connection may attach to the items it emits.
    fn properties(&self) -> Vec<Metadata>;

    /// Release resources held by the connection.
    async fn close(&mut self) -> ConnectorResult<()> {
        Ok(())
    }

    fn as_synchronize(&self) -> Option<&dyn SynchronizeConnection> {
        None
    }

    fn as_inventory(&self) -> Option<&dyn InventoryConnection> {
        None
    }

    fn as_data_sampling(&self) -> Option<&dyn DataSamplingConnection> {
        None
    }
}

/// Capability for connections that emit their whole content at once.
#[async_trait]
pub trait SynchronizeConnection: Connection {
    /// Produce the actions that bring the catalog in line with the source.
    async fn synchronize(&self) -> ConnectorResult<SynchronizeResult>;
}

/// Capability for connections that list items first and extract them on demand.
#[async_trait]
pub trait InventoryConnection: Connection {
    /// List every item the connection can extract.
    async fn inventory(&self) -> ConnectorResult<InventoryResult>;

    /// Extract the items with the given identifiers.
    ///
    /// Identifiers that no longer match an item yield a delete action or nothing.
    async fn extract_items(
        &self,
        identifiers: Vec<ItemIdentifier>,
    ) -> ConnectorResult<SynchronizeResult>;
}

/// Capability for connections that can sample dataset content.
#[async_trait]
pub trait DataSamplingConnection: Connection {
    /// Collect at most `sample_size` rows of the dataset; `None` when the dataset is
    /// unknown or sampling is not possible for it.
    async fn collect_data_sample(
        &self,
        identifier: &ItemIdentifier,
        sample_size: usize,
    ) -> ConnectorResult<Option<DataSample>>;
}

/// Entry point of a connector implementation.
pub trait ConnectorFactory: Send + Sync {
    fn connector_id(&self) -> &str;

    fn connector_type(&self) -> ConnectorType {
        ConnectorType::Dataset
    }

    /// Open a connection; an unusable configuration is a configuration error.
    fn new_connection(&self, config: ConnectionConfig) -> ConnectorResult<Box<dyn Connection>>;
}
