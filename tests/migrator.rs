#![cfg(feature = "sqlite")]

use creed_migrations::driver::sqlite::SqliteConnection;
use creed_migrations::error::ErrorKind;
use creed_migrations::migrate::{Direction, Migrator, State};
use creed_migrations::{params, Configuration, Connection, MigratorConfig, OutputWriter, Value};
use std::sync::{Arc, Mutex};

creed_migrations::migrations!(MIGRATIONS, "tests/migrations");

fn setup() -> (Arc<SqliteConnection>, Migrator, Arc<Mutex<Vec<String>>>) {
    let _ = env_logger::builder().is_test(true).try_init();

    let connection = Arc::new(SqliteConnection::open("sqlite://:memory:").expect("unable to connect"));
    let messages = Arc::new(Mutex::new(vec![]));
    let sink = messages.clone();

    let configuration = Configuration::new(connection.clone())
        .with_output_writer(OutputWriter::new(move |m| sink.lock().unwrap().push(m.to_string())));
    let migrator = Migrator::new(configuration, MIGRATIONS).expect("unable to register migrations");

    (connection, migrator, messages)
}

async fn count(connection: &SqliteConnection, sql: &str) -> i64 {
    let rows = connection.fetch_all(sql, &params![]).await.unwrap();
    match rows[0].get(0).unwrap() {
        Value::Int(count) => *count,
        value => panic!("unexpected value {:?}", value),
    }
}

#[test]
fn migrations_are_sorted_by_version() {
    let versions: Vec<_> = MIGRATIONS.iter().map(|m| m.version).collect();
    assert_eq!(versions, vec!["20240110204830", "20240115002100"]);
    assert_eq!(MIGRATIONS[0].migration.description(), "create sessions table");
    assert!(MIGRATIONS[1].migration.is_transactional());
}

#[tokio::test]
async fn can_migrate() {
    let (connection, migrator, messages) = setup();

    let results = migrator.migrate("latest", MigratorConfig::new()).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].sql().len(), 2);

    assert_eq!(count(&connection, "SELECT COUNT(*) FROM client_credential").await, 1);
    assert_eq!(count(&connection, "SELECT COUNT(*) FROM migration_versions").await, 2);
    assert_eq!(
        migrator.resolve("current").await.unwrap(),
        "20240115002100"
    );

    let executed = migrator.repository().executed_migrations().await.unwrap();
    let last = executed.last().unwrap();
    assert!(last.executed_at.is_some());
    assert!(last.execution_time.is_some());

    let messages = messages.lock().unwrap();
    assert!(messages.contains(&"++ migrating 20240110204830 (create sessions table)".to_string()));
    assert!(messages.iter().any(|m| m.contains(
        "with parameters ([default], [s3cr3t], [2099-01-01 00:00:00], [2024-01-15 00:21:00])"
    )));
}

#[tokio::test]
async fn can_migrate_down() {
    let (connection, migrator, _) = setup();
    migrator.migrate("latest", MigratorConfig::new()).await.unwrap();

    let results = migrator.migrate("prev", MigratorConfig::new()).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].direction(), Direction::Down);
    assert_eq!(count(&connection, "SELECT COUNT(*) FROM migration_versions").await, 1);

    let err = connection
        .fetch_all("SELECT * FROM client_credential", &params![])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownError);

    migrator.migrate("first", MigratorConfig::new()).await.unwrap();
    assert_eq!(count(&connection, "SELECT COUNT(*) FROM migration_versions").await, 0);
}

#[tokio::test]
async fn dry_run_leaves_the_database_untouched() {
    let (connection, migrator, _) = setup();

    let results = migrator
        .migrate("latest", MigratorConfig::new().set_dry_run(true))
        .await
        .unwrap();
    assert_eq!(results.len(), 2);

    assert!(!connection.table_exists("migration_versions").await.unwrap());
    assert!(connection
        .fetch_all("SELECT * FROM session", &params![])
        .await
        .is_err());
}

#[tokio::test]
async fn failed_statements_are_rolled_back() {
    let (connection, migrator, _) = setup();
    connection
        .execute_statement("CREATE TABLE client_credential (id INTEGER)", &params![])
        .await
        .unwrap();

    let err = migrator.migrate("latest", MigratorConfig::new()).await.unwrap_err();
    let failure = err.migration_failure().unwrap();
    assert_eq!(*failure.version(), "20240115002100");
    assert_eq!(failure.state(), State::Exec);

    assert_eq!(count(&connection, "SELECT COUNT(*) FROM migration_versions").await, 1);
    assert_eq!(
        migrator.resolve("current").await.unwrap(),
        "20240110204830"
    );
}

#[tokio::test]
async fn parameterized_migrations_cannot_be_dumped() {
    let (_, migrator, _) = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dump.sql");

    let err = migrator.write_sql_file("latest", &path).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PreparedStatementDump);
    assert!(!path.exists());

    assert!(migrator.write_sql_file("20240110204830", &path).await.unwrap());
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("-- Version 20240110204830\nCREATE TABLE session"));
}

#[tokio::test]
async fn single_versions_can_be_executed() {
    let (connection, migrator, _) = setup();

    migrator
        .execute("next", Direction::Up, MigratorConfig::new())
        .await
        .unwrap();
    assert_eq!(count(&connection, "SELECT COUNT(*) FROM session").await, 0);

    let mut version = migrator
        .repository()
        .version(&"20240115002100".into())
        .unwrap();
    version.mark_version(Direction::Up).await.unwrap();
    assert!(version.is_migrated().await.unwrap());
    assert!(connection
        .fetch_all("SELECT * FROM client_credential", &params![])
        .await
        .is_err());
}
