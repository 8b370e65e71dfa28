use creed_migrations::migrate::SqlBuffer;
use creed_migrations::schema::{Column, ColumnType, Schema};
use creed_migrations::{params, Error, Result};

pub fn description() -> &'static str {
    "create client_credentials table"
}

pub fn pre_up(_: &mut SqlBuffer, schema: &Schema) -> Result<()> {
    if schema.has_table("client_credential") {
        return Err(Error::skip_migration("client_credential table already exists"));
    }

    Ok(())
}

pub fn up(sql: &mut SqlBuffer, schema: &mut Schema) -> Result<()> {
    let table = schema.create_table("client_credential");
    table
        .add_column(Column::builder("client_id", ColumnType::String).set_notnull(true))
        .add_column(Column::builder("secret", ColumnType::Text).set_notnull(true))
        .add_column(Column::builder("expires_at", ColumnType::DateTime).set_notnull(true))
        .add_column(Column::builder("created_at", ColumnType::DateTime).set_notnull(true))
        .set_primary_key(&["client_id"]);

    sql.add_sql(table.get_create_sql(false));
    Ok(())
}

pub fn post_up(sql: &mut SqlBuffer, _: &Schema) -> Result<()> {
    sql.add_sql_with_params(
        "INSERT INTO client_credential (client_id, secret, expires_at, created_at) VALUES (?, ?, ?, ?)",
        params!["default", "s3cr3t", "2099-01-01 00:00:00", "2024-01-15 00:21:00"],
    );
    Ok(())
}

pub fn down(sql: &mut SqlBuffer, schema: &mut Schema) -> Result<()> {
    if let Some(table) = schema.drop_table("client_credential") {
        sql.add_sql(table.get_drop_sql());
    } else {
        sql.add_sql("DROP TABLE client_credential");
    }

    Ok(())
}
