use crate::migrate::metadata::{MetadataStorage, TableMetadataStorage, TableStorageConfiguration};
use crate::migrate::query_writer::{FileQueryWriter, QueryWriter};
use crate::schema::{EmptySchemaProvider, SchemaProvider};
use crate::{Connection, OutputWriter};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Collaborators shared by every migration run.
///
/// Unless replaced, the tracking store is a [`TableMetadataStorage`] over
/// the configured connection and SQL files are written by a
/// [`FileQueryWriter`]; both follow later changes to the storage
/// configuration and the output writer.
#[derive(Clone)]
pub struct Configuration {
    connection: Arc<dyn Connection>,
    output_writer: Arc<OutputWriter>,
    storage_configuration: TableStorageConfiguration,
    schema_provider: Arc<dyn SchemaProvider>,
    metadata_storage: Arc<dyn MetadataStorage>,
    custom_metadata_storage: bool,
    query_writer: Arc<dyn QueryWriter>,
    custom_query_writer: bool,
}

impl Configuration {
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        let output_writer = Arc::new(OutputWriter::default());
        let storage_configuration = TableStorageConfiguration::default();

        Self {
            metadata_storage: Arc::new(TableMetadataStorage::new(
                connection.clone(),
                storage_configuration.clone(),
            )),
            query_writer: Arc::new(FileQueryWriter::new(
                output_writer.clone(),
                storage_configuration.clone(),
            )),
            connection,
            output_writer,
            storage_configuration,
            schema_provider: Arc::new(EmptySchemaProvider),
            custom_metadata_storage: false,
            custom_query_writer: false,
        }
    }

    pub fn with_output_writer(mut self, output_writer: OutputWriter) -> Self {
        self.output_writer = Arc::new(output_writer);
        self.rebuild_defaults();
        self
    }

    pub fn with_storage_configuration(mut self, storage_configuration: TableStorageConfiguration) -> Self {
        self.storage_configuration = storage_configuration;
        self.rebuild_defaults();
        self
    }

    pub fn with_schema_provider<P: SchemaProvider + 'static>(mut self, schema_provider: P) -> Self {
        self.schema_provider = Arc::new(schema_provider);
        self
    }

    pub fn with_metadata_storage<M: MetadataStorage + 'static>(mut self, metadata_storage: M) -> Self {
        self.metadata_storage = Arc::new(metadata_storage);
        self.custom_metadata_storage = true;
        self
    }

    pub fn with_query_writer<W: QueryWriter + 'static>(mut self, query_writer: W) -> Self {
        self.query_writer = Arc::new(query_writer);
        self.custom_query_writer = true;
        self
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    pub fn output_writer(&self) -> &OutputWriter {
        &self.output_writer
    }

    pub fn storage_configuration(&self) -> &TableStorageConfiguration {
        &self.storage_configuration
    }

    pub fn schema_provider(&self) -> &dyn SchemaProvider {
        self.schema_provider.as_ref()
    }

    pub fn metadata_storage(&self) -> &dyn MetadataStorage {
        self.metadata_storage.as_ref()
    }

    pub fn query_writer(&self) -> &dyn QueryWriter {
        self.query_writer.as_ref()
    }

    fn rebuild_defaults(&mut self) {
        if !self.custom_metadata_storage {
            self.metadata_storage = Arc::new(TableMetadataStorage::new(
                self.connection.clone(),
                self.storage_configuration.clone(),
            ));
        }

        if !self.custom_query_writer {
            self.query_writer = Arc::new(FileQueryWriter::new(
                self.output_writer.clone(),
                self.storage_configuration.clone(),
            ));
        }
    }
}

impl Debug for Configuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("storage_configuration", &self.storage_configuration)
            .field("custom_metadata_storage", &self.custom_metadata_storage)
            .field("custom_query_writer", &self.custom_query_writer)
            .finish()
    }
}

/// Options of a single migration run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MigratorConfig {
    dry_run: bool,
    time_all_queries: bool,
}

impl MigratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures and reports SQL without sending it to the database or
    /// touching the tracking store.
    pub fn set_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn set_time_all_queries(mut self, time_all_queries: bool) -> Self {
        self.time_all_queries = time_all_queries;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn time_all_queries(&self) -> bool {
        self.time_all_queries
    }
}
