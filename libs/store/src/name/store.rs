use crate::name::model::Name;
use eyre::Result;
use sqlx::Error;
use sqlx::sqlite::SqliteExecutor;

/// Creates the name or refreshes its labels.
pub async fn upsert_name<'c>(executor: impl SqliteExecutor<'c>, name: &Name) -> Result<(), Error> {
    let query = r#"
        INSERT INTO names (id, sld, tld)
        VALUES (?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET sld = excluded.sld, tld = excluded.tld
        "#;
    sqlx::query(query).bind(&name.id).bind(&name.sld).bind(&name.tld).execute(executor).await?;
    Ok(())
}

/// Creates the name only if it does not exist yet.
pub async fn ensure_name<'c>(executor: impl SqliteExecutor<'c>, name: &Name) -> Result<(), Error> {
    let query = r#"
        INSERT INTO names (id, sld, tld)
        VALUES (?, ?, ?)
        ON CONFLICT(id) DO NOTHING
        "#;
    sqlx::query(query).bind(&name.id).bind(&name.sld).bind(&name.tld).execute(executor).await?;
    Ok(())
}

pub async fn get_name<'c>(
    executor: impl SqliteExecutor<'c>,
    id: &str,
) -> Result<Option<Name>, Error> {
    let query = "SELECT id, sld, tld FROM names WHERE id = ?";
    sqlx::query_as(query).bind(id).fetch_optional(executor).await
}
