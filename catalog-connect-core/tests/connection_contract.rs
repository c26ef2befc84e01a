//! Exercises an in-memory movie catalog connector through the host-facing traits.

use async_trait::async_trait;
use catalog_connect_core::{
    Connection, ConnectionConfig, ConnectorFactory, ConnectorMetrics, ConnectorResult,
    ConnectorType, ContactRelation, DataSample, DataSamplingConnection, DataSource, DataType,
    Field, FilterConfiguration, IdentificationProperty, InventoryConnection, InventoryResult,
    ItemAction, ItemIdentifier, ItemInventory, ItemStream, Metadata, PropertyValue, SampleValue,
    SourceBusinessTerm, SourceDataset, SourceItem, SynchronizeConnection, SynchronizeResult,
};
use chrono::{TimeZone, Utc};
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const CONNECTOR_ID: &str = "movies";

struct MovieConnectorFactory;

impl ConnectorFactory for MovieConnectorFactory {
    fn connector_id(&self) -> &str {
        CONNECTOR_ID
    }

    fn new_connection(&self, config: ConnectionConfig) -> ConnectorResult<Box<dyn Connection>> {
        config.validate()?;
        Ok(Box::new(MovieConnection::new(config)?))
    }
}

struct MovieConnection {
    filters: FilterConfiguration,
    origin: Metadata,
    metrics: Arc<ConnectorMetrics>,
    open_streams: Arc<AtomicUsize>,
}

impl MovieConnection {
    fn new(config: ConnectionConfig) -> ConnectorResult<Self> {
        Ok(Self {
            filters: config.filters,
            origin: Metadata::string(CONNECTOR_ID, "origin")?,
            metrics: Arc::new(ConnectorMetrics::new(CONNECTOR_ID)),
            open_streams: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn term(&self, id: &str, name: &str, description: &str) -> ConnectorResult<SourceBusinessTerm> {
        SourceBusinessTerm::builder()
            .with_id(id)
            .with_name(name)
            .with_description(description)
            .with_update_time(Utc.with_ymd_and_hms(2021, 1, 14, 11, 0, 37).unwrap())
            .with_metadata(&self.origin, PropertyValue::string("hard-coded"))
            .build()
    }

    fn terms(&self) -> ConnectorResult<Vec<SourceBusinessTerm>> {
        let owner = ContactRelation::builder()
            .with_email("john.doe@example.com")
            .with_name("John Doe")
            .with_role("Data owner")
            .build()?;

        Ok(vec![
            SourceBusinessTerm::builder()
                .with_id("movie")
                .with_name("Movie")
                .with_description("A film shown in a cinema or on television.")
                .with_metadata(&self.origin, PropertyValue::string("hard-coded"))
                .with_contact_relation(owner)
                .build()?,
            self.term("casting", "Casting", "The actors in a film, play, or show.")?,
            self.term("rating", "Rating", "A measurement of how good a movie is.")?,
            self.term("advertisement", "Advertisement", "A short film selling a product.")?,
        ])
    }

    fn table(name: &str) -> ItemIdentifier {
        ItemIdentifier::from_pairs([("schema", "cinema"), ("table", name)]).unwrap()
    }

    fn dataset(identifier: &ItemIdentifier) -> ConnectorResult<Option<SourceDataset>> {
        let fields = match identifier.get("table") {
            Some("films") => vec![
                Field::builder()
                    .with_name("id")
                    .with_data_type(DataType::Long)
                    .build()?,
                Field::builder()
                    .with_name("title")
                    .with_data_type(DataType::String)
                    .nullable(true)
                    .build()?,
            ],
            _ => return Ok(None),
        };

        SourceDataset::builder()
            .with_id(identifier.to_string())
            .with_name("films")
            .with_fields(fields)
            .with_primary_key("id")
            .build()
            .map(Some)
    }

    fn track_stream<T: Send + 'static>(&self, stream: ItemStream<T>) -> ItemStream<T> {
        let open = self.open_streams.clone();
        open.fetch_add(1, Ordering::SeqCst);
        stream.with_release(move || {
            open.fetch_sub(1, Ordering::SeqCst);
        })
    }
}

#[async_trait]
impl Connection for MovieConnection {
    fn data_sources(&self) -> Vec<DataSource> {
        let id = ItemIdentifier::from_pairs([("catalog", "movies")]).unwrap();
        vec![DataSource::new(id, "Movie catalog").unwrap()]
    }

    fn properties(&self) -> Vec<Metadata> {
        vec![self.origin.clone()]
    }

    fn as_synchronize(&self) -> Option<&dyn SynchronizeConnection> {
        Some(self)
    }

    fn as_inventory(&self) -> Option<&dyn InventoryConnection> {
        Some(self)
    }

    fn as_data_sampling(&self) -> Option<&dyn DataSamplingConnection> {
        Some(self)
    }
}

#[async_trait]
impl SynchronizeConnection for MovieConnection {
    async fn synchronize(&self) -> ConnectorResult<SynchronizeResult> {
        let mut actions = Vec::new();
        for term in self.terms()? {
            let properties = HashMap::from([
                ("id".to_string(), term.base().id().to_string()),
                ("name".to_string(), term.base().name().to_string()),
            ]);
            if self.filters.whitelist_filter_with(&self.metrics, &properties) {
                actions.push(ItemAction::upsert(term));
            }
        }
        actions.push(ItemAction::delete("obsolete-term"));

        let stream = self.track_stream(ItemStream::from_iter(actions.into_iter().map(Ok)));
        Ok(SynchronizeResult::new(stream).with_metrics(self.metrics.clone()))
    }
}

#[async_trait]
impl InventoryConnection for MovieConnection {
    async fn inventory(&self) -> ConnectorResult<InventoryResult> {
        let inventory = ["films", "screenings"]
            .into_iter()
            .map(|name| Ok(ItemInventory::new(Self::table(name), ["cinema", name])));
        Ok(InventoryResult::new(
            self.track_stream(ItemStream::from_iter(inventory)),
        ))
    }

    async fn extract_items(
        &self,
        identifiers: Vec<ItemIdentifier>,
    ) -> ConnectorResult<SynchronizeResult> {
        let actions = identifiers.into_iter().map(|identifier| {
            Ok(match Self::dataset(&identifier)? {
                Some(dataset) => ItemAction::upsert(dataset),
                None => ItemAction::delete(identifier.to_string()),
            })
        });
        Ok(SynchronizeResult::new(
            self.track_stream(ItemStream::from_iter(actions.collect::<Vec<_>>())),
        ))
    }
}

#[async_trait]
impl DataSamplingConnection for MovieConnection {
    async fn collect_data_sample(
        &self,
        identifier: &ItemIdentifier,
        sample_size: usize,
    ) -> ConnectorResult<Option<DataSample>> {
        let Some(dataset) = Self::dataset(identifier)? else {
            return Ok(None);
        };

        let mut columns = Vec::new();
        for field in dataset.fields() {
            let property = IdentificationProperty::new("field", field.name())?;
            columns.push(identifier.with_suffix(property));
        }

        let rows = [(1, "Metropolis"), (2, "Brazil"), (3, "Alien")];
        let mut builder = DataSample::builder(columns);
        for (id, title) in rows.into_iter().take(sample_size) {
            builder = builder.add_row([SampleValue::from(id), SampleValue::from(title)])?;
        }
        builder.build().map(Some)
    }
}

fn connection_with_filters(filters: &str) -> Box<dyn Connection> {
    let config = ConnectionConfig::from_toml_str(&format!(
        r#"
connector_id = "movies"
connection_name = "Movies"
connection_code = "movies"
{}
"#,
        filters
    ))
    .unwrap();
    MovieConnectorFactory.new_connection(config).unwrap()
}

async fn drain(mut stream: ItemStream<ItemAction>) -> Vec<ItemAction> {
    let mut actions = Vec::new();
    while let Some(action) = stream.next().await {
        actions.push(action.unwrap());
    }
    actions
}

#[tokio::test]
async fn test_factory_describes_connector() {
    assert_eq!(MovieConnectorFactory.connector_type(), ConnectorType::Dataset);

    let connection = connection_with_filters("");
    assert_eq!(connection.data_sources()[0].name(), "Movie catalog");
    assert_eq!(connection.properties()[0].code(), "origin");

    let err = MovieConnectorFactory
        .new_connection(ConnectionConfig::new("movies", "", "movies"))
        .err()
        .unwrap();
    assert!(err.is_configuration());
}

#[tokio::test]
async fn test_synchronize_without_filters_keeps_everything() {
    let connection = connection_with_filters("");
    let sync = connection.as_synchronize().unwrap();

    let actions = drain(sync.synchronize().await.unwrap().into_stream()).await;
    let ids: Vec<&str> = actions.iter().map(ItemAction::item_id).collect();
    assert_eq!(
        ids,
        ["movie", "casting", "rating", "advertisement", "obsolete-term"]
    );

    let movie = match actions[0].item() {
        Some(SourceItem::BusinessTerm(term)) => term,
        other => panic!("unexpected item {:?}", other),
    };
    assert_eq!(movie.base().contact_relations()[0].role().name(), "Data owner");
    assert_eq!(
        movie.base().metadata_value("origin"),
        Some(&PropertyValue::string("hard-coded"))
    );
}

#[tokio::test]
async fn test_synchronize_applies_first_matching_filter() {
    let connection = connection_with_filters(
        r#"
[[filters]]
id = "keep-movie"
action = "ACCEPT"
[filters.rules]
id = "glob:movie"

[[filters]]
id = "drop-ads-and-movies"
action = "REJECT"
[filters.rules]
name = "regex:(Advert.*|Movie)"
"#,
    );
    let sync = connection.as_synchronize().unwrap();

    let actions = drain(sync.synchronize().await.unwrap().into_stream()).await;
    let ids: Vec<&str> = actions.iter().map(ItemAction::item_id).collect();
    assert_eq!(ids, ["movie", "casting", "rating", "obsolete-term"]);
}

#[tokio::test]
async fn test_synchronize_counts_filter_decisions_and_actions() {
    let config = ConnectionConfig::from_toml_str(
        r#"
connector_id = "movies"
connection_name = "Movies"
connection_code = "movies"

[[filters]]
id = "drop-ads"
action = "REJECT"
[filters.rules]
name = "glob:Advert*"
"#,
    )
    .unwrap();
    let connection = MovieConnection::new(config).unwrap();

    let actions = drain(connection.synchronize().await.unwrap().into_stream()).await;
    assert_eq!(actions.len(), 4);
    assert_eq!(connection.metrics.filter_decisions(), 4);
    assert_eq!(connection.metrics.actions(), 4);
    assert_eq!(connection.metrics.stream_errors(), 0);
}

#[tokio::test]
async fn test_streams_release_once_consumed_or_dropped() {
    let connection = MovieConnection::new(ConnectionConfig::new("movies", "Movies", "movies"))
        .unwrap();

    let mut result = connection.synchronize().await.unwrap();
    assert_eq!(connection.open_streams.load(Ordering::SeqCst), 1);
    let first = result.items().next().await.unwrap().unwrap();
    assert_eq!(first.item_id(), "movie");
    drop(result);
    assert_eq!(connection.open_streams.load(Ordering::SeqCst), 0);

    let stream = connection.inventory().await.unwrap().into_stream();
    assert_eq!(connection.open_streams.load(Ordering::SeqCst), 1);
    let inventory = stream.try_collect_all().await.unwrap();
    assert_eq!(inventory.len(), 2);
    assert_eq!(inventory[1].label_path(), ["cinema", "screenings"]);
    assert_eq!(connection.open_streams.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_inventory_then_extract() {
    let connection = connection_with_filters("");
    let inventory = connection.as_inventory().unwrap();

    let identifiers: Vec<ItemIdentifier> = inventory
        .inventory()
        .await
        .unwrap()
        .into_stream()
        .try_collect_all()
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.identifier().clone())
        .collect();

    let actions = drain(
        inventory
            .extract_items(identifiers)
            .await
            .unwrap()
            .into_stream(),
    )
    .await;

    assert_eq!(actions.len(), 2);
    match actions[0].item() {
        Some(SourceItem::Dataset(dataset)) => {
            assert_eq!(dataset.base().id(), "schema=cinema/table=films");
            assert_eq!(dataset.primary_keys(), ["id"]);
            assert!(dataset.field("title").unwrap().is_nullable());
        }
        other => panic!("unexpected item {:?}", other),
    }
    assert_eq!(
        actions[1],
        ItemAction::delete("schema=cinema/table=screenings")
    );
}

#[tokio::test]
async fn test_data_sampling() {
    let connection = connection_with_filters("");
    let sampling = connection.as_data_sampling().unwrap();

    let sample = sampling
        .collect_data_sample(&MovieConnection::table("films"), 2)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sample.samples().len(), 2);
    assert_eq!(
        sample.to_json().unwrap(),
        concat!(
            r#"{"fields":[{"schema":"cinema","table":"films","field":"id"},"#,
            r#"{"schema":"cinema","table":"films","field":"title"}],"#,
            r#""samples":[[1,"Metropolis"],[2,"Brazil"]]}"#
        )
    );

    let missing = sampling
        .collect_data_sample(&MovieConnection::table("screenings"), 2)
        .await
        .unwrap();
    assert!(missing.is_none());
}
