use crate::migrate::metadata::TableStorageConfiguration;
use crate::migrate::{Direction, VersionId};
use crate::{AsyncResult, OutputWriter};
use chrono::{DateTime, Local};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Dumps captured statements to a SQL file.
pub trait QueryWriter: Send + Sync {
    fn write<'a>(
        &'a self,
        path: &'a Path,
        direction: Direction,
        queries_by_version: &'a [(VersionId, Vec<String>)],
    ) -> AsyncResult<'a, bool>;
}

/// Writes plain SQL files, including the statements updating the tracking
/// table so the file can be replayed by hand.
pub struct FileQueryWriter {
    output_writer: Arc<OutputWriter>,
    storage_configuration: TableStorageConfiguration,
}

impl FileQueryWriter {
    pub fn new(output_writer: Arc<OutputWriter>, storage_configuration: TableStorageConfiguration) -> Self {
        Self {
            output_writer,
            storage_configuration,
        }
    }

    pub fn build_migration_file(
        &self,
        queries_by_version: &[(VersionId, Vec<String>)],
        direction: Direction,
        now: DateTime<Local>,
    ) -> String {
        let mut contents = format!(
            "-- Migration File Generated on {}\n",
            now.format("%Y-%m-%d %H:%M:%S")
        );

        for (version, queries) in queries_by_version {
            contents.push_str(&format!("\n-- Version {}\n", version));
            for query in queries {
                contents.push_str(query.trim_end().trim_end_matches(';'));
                contents.push_str(";\n");
            }

            contents.push_str(&self.version_update_query(version, direction));
        }

        contents
    }

    fn version_update_query(&self, version: &VersionId, direction: Direction) -> String {
        let configuration = &self.storage_configuration;
        let version = version.as_str().replace('\'', "''");

        match direction {
            Direction::Up => format!(
                "INSERT INTO {} ({}, {}) VALUES ('{}', CURRENT_TIMESTAMP);\n",
                configuration.table_name(),
                configuration.version_column_name(),
                configuration.executed_at_column_name(),
                version
            ),
            Direction::Down => format!(
                "DELETE FROM {} WHERE {} = '{}';\n",
                configuration.table_name(),
                configuration.version_column_name(),
                version
            ),
        }
    }

    async fn migration_file_path(path: &Path, now: DateTime<Local>) -> PathBuf {
        let is_dir = tokio::fs::metadata(path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

        if is_dir {
            path.join(format!("migration_{}.sql", now.format("%Y%m%d%H%M%S")))
        } else {
            path.to_path_buf()
        }
    }
}

impl QueryWriter for FileQueryWriter {
    fn write<'a>(
        &'a self,
        path: &'a Path,
        direction: Direction,
        queries_by_version: &'a [(VersionId, Vec<String>)],
    ) -> AsyncResult<'a, bool> {
        Box::pin(async move {
            let now = Local::now();
            let contents = self.build_migration_file(queries_by_version, direction, now);
            let path = Self::migration_file_path(path, now).await;

            self.output_writer
                .write(format!("Writing migration file to \"{}\"", path.display()));
            tokio::fs::write(&path, contents).await?;
            debug!(target: "creed::migrations", "Written {} versions to {}", queries_by_version.len(), path.display());

            Ok(true)
        })
    }
}
