use crate::configuration::{Configuration, MigratorConfig};
use crate::error::{ErrorKind, MigrationFailure};
use crate::migrate::{Direction, ExecutionResult, Migration, Query, SqlBuffer, State, VersionId};
use crate::schema::Schema;
use crate::stopwatch::{format_bytes, Stopwatch};
use crate::{Error, ParameterFormatter, Result};
use log::{error, info, warn};

/// Drives one migration version through its lifecycle.
///
/// Hooks run in `Pre`, `Exec` and `Post` order. Statements registered by
/// the hooks are recorded in the result and, unless running dry, executed
/// inside a single transaction spanning the three stages. A failure rolls
/// the transaction back and is returned with the stage it happened in.
/// Every run is timed with its own [`Stopwatch`], dropped when the run ends.
pub struct VersionExecutor {
    configuration: Configuration,
    parameter_formatter: ParameterFormatter,
}

struct Execution<'a> {
    version: &'a VersionId,
    migration: &'a dyn Migration,
    direction: Direction,
    config: MigratorConfig,
    stopwatch: Stopwatch,
    state: State,
    in_transaction: bool,
    result: ExecutionResult,
}

impl VersionExecutor {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            parameter_formatter: ParameterFormatter::new(),
        }
    }

    pub async fn execute(
        &self,
        version: &VersionId,
        migration: &dyn Migration,
        direction: Direction,
        config: MigratorConfig,
    ) -> Result<ExecutionResult> {
        let stopwatch = Stopwatch::new();
        let event = stopwatch.start("migrate");
        let mut execution = Execution {
            version,
            migration,
            direction,
            config,
            stopwatch,
            state: State::None,
            in_transaction: false,
            result: ExecutionResult::new(version.clone(), direction),
        };

        self.output_header(&execution);
        let outcome = self.run(&mut execution).await;

        let period = event.stop();
        execution.result.set_time(period.duration());
        execution.result.set_memory(period.memory());

        match outcome {
            Ok(()) => {
                if execution.result.queries().is_empty() {
                    self.output_warning(format!(
                        "Migration {} was executed but did not result in any SQL statements.",
                        version
                    ));
                }

                self.configuration.output_writer().write(format!(
                    "{} (took {}ms, used {} memory)",
                    match direction {
                        Direction::Up => "++ migrated",
                        Direction::Down => "-- reverted",
                    },
                    period.duration().as_millis(),
                    format_bytes(period.memory().unwrap_or(0)),
                ));

                Ok(execution.result)
            }
            Err(e) if e.kind() == ErrorKind::SkipMigration => {
                self.roll_back(&mut execution).await;
                self.output_warning(format!(
                    "Migration {} skipped during {}. Reason: {}",
                    version, execution.state, e
                ));

                execution.result.set_skipped(true);
                execution.result.set_state(State::None);
                Ok(execution.result)
            }
            Err(e) => {
                self.roll_back(&mut execution).await;

                let message = format!(
                    "Migration {} failed during {}. Error {}",
                    version, execution.state, e
                );
                error!(target: "creed::migrations", "{}", message);
                self.configuration.output_writer().write(&message);

                execution.result.set_error(e.to_string());
                execution.result.set_state(execution.state);

                Err(Error::migration_failed(MigrationFailure::new(
                    version.clone(),
                    direction,
                    execution.state,
                    execution.result,
                    e,
                )))
            }
        }
    }

    async fn run(&self, execution: &mut Execution<'_>) -> Result<()> {
        let connection = self.configuration.connection();
        let schema_provider = self.configuration.schema_provider();

        if !execution.config.is_dry_run() && execution.migration.is_transactional() {
            connection.begin_transaction().await?;
            execution.in_transaction = true;
        }

        let mut buffer = SqlBuffer::new();
        let from_schema = schema_provider.create_from_schema().await?;

        execution.state = State::Pre;
        pre_hook(execution.migration, execution.direction, &mut buffer, &from_schema)?;

        execution.state = State::Exec;
        let mut to_schema = schema_provider.create_to_schema(&from_schema);
        main_hook(execution.migration, execution.direction, &mut buffer, &mut to_schema)?;
        buffer.add_statements(schema_provider.get_sql_diff_to_migrate(&from_schema, &to_schema))?;
        self.flush(execution, &mut buffer).await?;

        execution.state = State::Post;
        post_hook(execution.migration, execution.direction, &mut buffer, &to_schema)?;
        self.flush(execution, &mut buffer).await?;

        if execution.in_transaction {
            connection.commit().await?;
            execution.in_transaction = false;
        }

        execution.result.set_to_schema(to_schema);
        execution.state = State::None;

        Ok(())
    }

    async fn flush(&self, execution: &mut Execution<'_>, buffer: &mut SqlBuffer) -> Result<()> {
        let queries = buffer.take();
        execution.result.add_queries(queries.iter().cloned());

        for query in &queries {
            self.output_query(query);
            if execution.config.is_dry_run() {
                continue;
            }

            let event = execution.stopwatch.start_timer("query");
            self.configuration
                .connection()
                .execute_statement(query.sql(), query.parameters())
                .await?;
            let period = event.stop();

            if execution.config.time_all_queries() {
                self.configuration
                    .output_writer()
                    .write(format!("  {}ms", period.duration().as_millis()));
            }
        }

        Ok(())
    }

    async fn roll_back(&self, execution: &mut Execution<'_>) {
        if !execution.in_transaction {
            return;
        }

        execution.in_transaction = false;
        if let Err(e) = self.configuration.connection().roll_back().await {
            error!(target: "creed::migrations", "Unable to roll back migration {}: {}", execution.version, e);
        }
    }

    fn output_header(&self, execution: &Execution<'_>) {
        let mut header = match execution.direction {
            Direction::Up => format!("++ migrating {}", execution.version),
            Direction::Down => format!("-- reverting {}", execution.version),
        };

        let description = execution.migration.description();
        if !description.is_empty() {
            header.push_str(&format!(" ({})", description));
        }

        info!(target: "creed::migrations", "Executing migration {} ({})", execution.version, execution.direction);
        self.configuration.output_writer().write(header);
    }

    fn output_query(&self, query: &Query) {
        let params = self.parameter_formatter.format_parameters(query.parameters());
        self.configuration
            .output_writer()
            .write(format!("     -> {} {}", query.sql(), params).trim_end());
    }

    fn output_warning(&self, message: String) {
        warn!(target: "creed::migrations", "{}", message);
        self.configuration.output_writer().write(message);
    }
}

fn pre_hook(migration: &dyn Migration, direction: Direction, sql: &mut SqlBuffer, schema: &Schema) -> Result<()> {
    match direction {
        Direction::Up => migration.pre_up(sql, schema),
        Direction::Down => migration.pre_down(sql, schema),
    }
}

fn main_hook(migration: &dyn Migration, direction: Direction, sql: &mut SqlBuffer, schema: &mut Schema) -> Result<()> {
    match direction {
        Direction::Up => migration.up(sql, schema),
        Direction::Down => migration.down(sql, schema),
    }
}

fn post_hook(migration: &dyn Migration, direction: Direction, sql: &mut SqlBuffer, schema: &Schema) -> Result<()> {
    match direction {
        Direction::Up => migration.post_up(sql, schema),
        Direction::Down => migration.post_down(sql, schema),
    }
}
