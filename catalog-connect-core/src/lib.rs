//! # Catalog Connect Core
//!
//! Core SDK for building data catalog connectors.
//!
//! This library provides the data model and contracts a connector uses to describe the
//! content of a source system to a data catalog: validated item builders, metadata
//! definitions, item filters, lazy action streams and the capability traits the host
//! calls.
//!
//! ## Overview
//!
//! A connector opens connections that either:
//! - **Synchronize**: emit every item of the source as a stream of actions
//! - **Inventory**: list item identifiers first, then extract selected items on demand
//!
//! and may additionally collect **data samples** from datasets.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use catalog_connect_core::{
//!     Connection, ConnectorResult, DataSource, ItemAction, Metadata, SourceCustomItem,
//!     SynchronizeConnection, SynchronizeResult,
//! };
//!
//! pub struct MovieConnection;
//!
//! #[async_trait]
//! impl Connection for MovieConnection {
//!     fn data_sources(&self) -> Vec<DataSource> {
//!         Vec::new()
//!     }
//!
//!     fn properties(&self) -> Vec<Metadata> {
//!         Vec::new()
//!     }
//!
//!     fn as_synchronize(&self) -> Option<&dyn SynchronizeConnection> {
//!         Some(self)
//!     }
//! }
//!
//! #[async_trait]
//! impl SynchronizeConnection for MovieConnection {
//!     async fn synchronize(&self) -> ConnectorResult<SynchronizeResult> {
//!         let movie = SourceCustomItem::builder()
//!             .with_id("movie/1")
//!             .with_name("Metropolis")
//!             .with_code("movie")
//!             .build()?;
//!         Ok(SynchronizeResult::from_iter(vec![ItemAction::upsert(movie)]))
//!     }
//! }
//! ```
//!
//! ## Features
//!
//! - **Validated Items**: Builders check required attributes and length bounds before an item exists
//! - **Item Filters**: Glob and regex rules decide which items a connection keeps
//! - **Lazy Results**: Single-pass async streams with a release hook for connector resources
//! - **Observability**: Structured logging through `tracing` and counters through `metrics`
//! - **Configuration**: TOML files with environment variable overrides

mod action;
mod config;
mod contact;
mod error;
mod field;
mod filter;
mod item;
mod metadata;
mod property;
mod reference;
mod result;
mod sample;
mod traits;

pub mod metrics;
pub mod telemetry;
pub mod validation;

// Re-export public API
pub use action::ItemAction;
pub use config::ConnectionConfig;
pub use contact::{Contact, ContactRelation, ContactRelationBuilder, Role};
pub use error::{ConnectorError, ConnectorResult};
pub use field::{DataType, Field, FieldBuilder};
pub use filter::{
    Filter, FilterAction, FilterConfiguration, FilterDecision, Rule, RuleType,
};
pub use item::{
    BusinessTermParts, CustomItemParts, DatasetParts, ForeignKey, ItemBase, ItemBuilder,
    ItemParts, Partitioning, PartitioningBuilder, SourceBusinessTerm, SourceCustomItem,
    SourceDataset, SourceItem, SourceVisualisation,
    SourceVisualisationField, SourceVisualisationFieldBuilder, VisualisationFieldType,
    VisualisationParts,
};
pub use metadata::Metadata;
pub use self::metrics::ConnectorMetrics;
pub use property::{PropertyType, PropertyValue};
pub use reference::{IdentificationProperty, ItemIdentifier, ItemInventory, ItemReference};
pub use result::{InventoryResult, ItemStream, SynchronizeResult};
pub use sample::{DataSample, DataSampleBuilder, SampleValue};
pub use traits::{
    Connection, ConnectorFactory, ConnectorType, DataSamplingConnection, DataSource,
    InventoryConnection, SynchronizeConnection,
};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
