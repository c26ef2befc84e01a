//! Glossary connector example
//!
//! Publishes the terms listed under `[settings.terms]` of a connection file as business
//! terms, honouring the connection's filters.
//!
//! Usage:
//!   cargo run --example glossary_connector -- glossary.toml
//!
//! With a `glossary.toml` such as:
//!
//! ```toml
//! connector_id = "glossary"
//! connection_name = "Company glossary"
//! connection_code = "glossary"
//!
//! [[filters]]
//! id = "no-drafts"
//! action = "REJECT"
//! [filters.rules]
//! name = "glob:Draft *"
//!
//! [settings.terms]
//! Revenue = "Money coming in."
//! "Draft Churn" = "Customers leaving."
//! ```

use async_trait::async_trait;
use catalog_connect_core::{
    telemetry, Connection, ConnectionConfig, ConnectorFactory, ConnectorMetrics,
    ConnectorResult, DataSource, ItemAction, ItemIdentifier, Metadata, PropertyValue,
    SourceBusinessTerm, SynchronizeConnection, SynchronizeResult,
};
use futures::StreamExt;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

struct GlossaryConnector;

impl ConnectorFactory for GlossaryConnector {
    fn connector_id(&self) -> &str {
        "glossary"
    }

    fn new_connection(&self, config: ConnectionConfig) -> ConnectorResult<Box<dyn Connection>> {
        config.validate()?;
        let terms = config.get_map("terms")?;
        Ok(Box::new(GlossaryConnection {
            source: Metadata::string(self.connector_id(), "source")?,
            metrics: Arc::new(ConnectorMetrics::new(self.connector_id())),
            code: config.connection_code.clone(),
            config,
            terms,
        }))
    }
}

struct GlossaryConnection {
    config: ConnectionConfig,
    code: String,
    source: Metadata,
    metrics: Arc<ConnectorMetrics>,
    terms: BTreeMap<String, String>,
}

#[async_trait]
impl Connection for GlossaryConnection {
    fn data_sources(&self) -> Vec<DataSource> {
        ItemIdentifier::from_pairs([("connection", self.code.as_str())])
            .and_then(|id| DataSource::new(id, self.config.connection_name.clone()))
            .map(|source| vec![source])
            .unwrap_or_default()
    }

    fn properties(&self) -> Vec<Metadata> {
        vec![self.source.clone()]
    }

    fn as_synchronize(&self) -> Option<&dyn SynchronizeConnection> {
        Some(self)
    }
}

#[async_trait]
impl SynchronizeConnection for GlossaryConnection {
    async fn synchronize(&self) -> ConnectorResult<SynchronizeResult> {
        let mut actions = Vec::new();
        for (name, description) in &self.terms {
            let properties = HashMap::from([("name".to_string(), name.clone())]);
            if !self
                .config
                .filters
                .whitelist_filter_with(&self.metrics, &properties)
            {
                continue;
            }

            let term = SourceBusinessTerm::builder()
                .with_id(format!("{}/{}", self.code, name.to_lowercase()))
                .with_name(name)
                .with_description(description)
                .with_metadata(&self.source, PropertyValue::string("connection file"))
                .build()?;
            actions.push(ItemAction::upsert(term));
        }

        Ok(SynchronizeResult::from_iter(actions).with_metrics(self.metrics.clone()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "glossary.toml".to_string());

    let mut config = ConnectionConfig::from_file(&path)?;
    config.apply_env_overrides();
    telemetry::init_tracing(&config.log_level);

    let connection = GlossaryConnector.new_connection(config)?;
    let Some(sync) = connection.as_synchronize() else {
        anyhow::bail!("connection cannot synchronize");
    };

    let mut actions = sync.synchronize().await?.into_stream();
    while let Some(action) = actions.next().await {
        let action = action?;
        tracing::info!(kind = action.kind(), item_id = action.item_id(), "Produced action");
    }

    Ok(())
}
