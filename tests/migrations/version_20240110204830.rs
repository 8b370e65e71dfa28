use creed_migrations::migrate::SqlBuffer;
use creed_migrations::schema::Schema;
use creed_migrations::Result;

fn description() -> &'static str {
    "create sessions table"
}

fn up(sql: &mut SqlBuffer, _: &mut Schema) -> Result<()> {
    sql.add_sql("CREATE TABLE session (id VARCHAR(64) NOT NULL, data TEXT, PRIMARY KEY (id))");
    Ok(())
}

fn down(sql: &mut SqlBuffer, _: &mut Schema) -> Result<()> {
    sql.add_sql("DROP TABLE session");
    Ok(())
}
