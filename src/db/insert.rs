// src/db/insert.rs
use crate::dataset::Dataset;
use crate::table::{Table, Value};
use anyhow::{anyhow, Context, Result};
use sqlx::{Any, AnyConnection, Connection, QueryBuilder, Row};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

/// Upper bound on bound parameters per INSERT statement; both MySQL and
/// SQLite accept at least this many.
pub const MAX_BIND_PARAMS: usize = 30_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Inserted(usize),
    /// The cleaned row set was empty.
    SkippedEmpty,
    /// Every row's key was already in the table.
    NoNewRows,
    Failed(String),
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadOutcome::Inserted(n) => write!(f, "inserted {} rows", n),
            LoadOutcome::SkippedEmpty => write!(f, "skipped (no data)"),
            LoadOutcome::NoNewRows => write!(f, "skipped (no new rows)"),
            LoadOutcome::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}

/// Every value currently stored in the integer key column `key` of `table`.
pub async fn existing_keys(
    conn: &mut AnyConnection,
    table: &str,
    key: &str,
) -> Result<HashSet<Value>> {
    let sql = format!("SELECT `{}` FROM `{}`", key, table);
    let rows = sqlx::query(&sql)
        .fetch_all(&mut *conn)
        .await
        .with_context(|| format!("reading existing keys from `{}`", table))?;

    let mut keys = HashSet::with_capacity(rows.len());
    for row in &rows {
        let k: Option<i64> = row.try_get(0)?;
        keys.insert(k.map(Value::Int).unwrap_or(Value::Null));
    }
    Ok(keys)
}

/// Load one cleaned row set into its table inside a single transaction.
///
/// Keyed datasets first drop rows whose key is already stored. The remaining
/// rows go in as multi-row INSERTs of at most `MAX_BIND_PARAMS` parameters
/// each, then the transaction commits. On error nothing from this call is
/// kept.
#[tracing::instrument(level = "info", skip_all, fields(table = dataset.table_name()))]
pub async fn insert_table(
    conn: &mut AnyConnection,
    dataset: Dataset,
    table: &Table,
) -> Result<LoadOutcome> {
    let name = dataset.table_name();
    if table.is_empty() {
        info!("no data to insert for {}", name);
        return Ok(LoadOutcome::SkippedEmpty);
    }

    let mut tx = conn.begin().await.context("starting transaction")?;

    let rows: Vec<&Vec<Value>> = match dataset.primary_key() {
        Some(key) => {
            let idx = table
                .column_index(key)
                .ok_or_else(|| anyhow!("key column `{}` missing from {} data", key, name))?;
            let existing = existing_keys(&mut *tx, name, key).await?;
            let fresh: Vec<_> = table
                .rows
                .iter()
                .filter(|r| !existing.contains(&r[idx]))
                .collect();
            debug!(
                existing = existing.len(),
                skipped = table.len() - fresh.len(),
                "filtered rows with stored keys"
            );
            fresh
        }
        None => table.rows.iter().collect(),
    };

    if rows.is_empty() {
        info!("no new data to insert into {}", name);
        tx.commit().await?;
        return Ok(LoadOutcome::NoNewRows);
    }

    let columns = table
        .column_names()
        .iter()
        .map(|c| format!("`{}`", c))
        .collect::<Vec<_>>()
        .join(", ");
    let per_statement = (MAX_BIND_PARAMS / table.columns.len().max(1)).max(1);

    for chunk in rows.chunks(per_statement) {
        let mut qb: QueryBuilder<Any> =
            QueryBuilder::new(format!("INSERT INTO `{}` ({}) ", name, columns));
        qb.push_values(chunk, |mut b, row| {
            for v in row.iter() {
                match v {
                    Value::Null => b.push_bind(None::<String>),
                    Value::Int(i) => b.push_bind(*i),
                    Value::Decimal(f) => b.push_bind(*f),
                    Value::Str(s) => b.push_bind(s.clone()),
                    Value::Date(d) => b.push_bind(d.format("%Y-%m-%d").to_string()),
                };
            }
        });
        qb.build()
            .execute(&mut *tx)
            .await
            .with_context(|| format!("inserting into `{}`", name))?;
    }

    tx.commit()
        .await
        .with_context(|| format!("committing `{}`", name))?;
    info!("data inserted into {} successfully ({} rows)", name, rows.len());
    Ok(LoadOutcome::Inserted(rows.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{connect, create_table};
    use crate::read::parse_table;
    use anyhow::Result;

    async fn memory_db() -> Result<AnyConnection> {
        let mut conn = connect("sqlite::memory:").await?;
        for d in Dataset::ALL {
            create_table(&mut conn, d).await?;
        }
        Ok(conn)
    }

    async fn count(conn: &mut AnyConnection, table: &str) -> Result<i64> {
        let row = sqlx::query(&format!("SELECT COUNT(*) FROM `{}`", table))
            .fetch_one(&mut *conn)
            .await?;
        Ok(row.try_get(0)?)
    }

    #[tokio::test]
    async fn empty_row_set_is_skipped() -> Result<()> {
        let mut conn = memory_db().await?;
        let empty = parse_table("CustomerKey,Name\n")?;
        let out = insert_table(&mut conn, Dataset::Customer, &empty).await?;
        assert_eq!(out, LoadOutcome::SkippedEmpty);
        assert_eq!(count(&mut conn, "Customer").await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn stored_keys_are_not_reinserted() -> Result<()> {
        let mut conn = memory_db().await?;
        let first = parse_table("CustomerKey,Name\n5,Original\n")?;
        insert_table(&mut conn, Dataset::Customer, &first).await?;

        let second = parse_table("CustomerKey,Name\n5,Replacement\n6,New\n")?;
        let out = insert_table(&mut conn, Dataset::Customer, &second).await?;
        assert_eq!(out, LoadOutcome::Inserted(1));

        let name: String = sqlx::query("SELECT `Name` FROM `Customer` WHERE `CustomerKey` = 5")
            .fetch_one(&mut conn)
            .await?
            .try_get(0)?;
        assert_eq!(name, "Original");
        assert_eq!(count(&mut conn, "Customer").await?, 2);

        let keys = existing_keys(&mut conn, "Customer", "CustomerKey").await?;
        assert!(keys.contains(&Value::Int(5)) && keys.contains(&Value::Int(6)));
        Ok(())
    }

    #[tokio::test]
    async fn all_keys_present_means_no_new_rows() -> Result<()> {
        let mut conn = memory_db().await?;
        let t = parse_table("ProductKey,Product Name\n1,Widget\n")?;
        insert_table(&mut conn, Dataset::Products, &t).await?;
        let out = insert_table(&mut conn, Dataset::Products, &t).await?;
        assert_eq!(out, LoadOutcome::NoNewRows);
        Ok(())
    }

    #[tokio::test]
    async fn nulls_land_as_sql_null() -> Result<()> {
        let mut conn = memory_db().await?;
        let t = parse_table("Table_Name,Field_Name,Description\nSales,Quantity,\n")?;
        insert_table(&mut conn, Dataset::DataDictionary, &t).await?;

        let nulls: i64 =
            sqlx::query("SELECT COUNT(*) FROM `Data_Dictionary` WHERE `Description` IS NULL")
                .fetch_one(&mut conn)
                .await?
                .try_get(0)?;
        assert_eq!(nulls, 1);
        Ok(())
    }

    #[tokio::test]
    async fn large_batches_split_across_statements() -> Result<()> {
        let mut conn = memory_db().await?;
        let mut csv = String::from("Table_Name,Field_Name,Description\n");
        // 3 columns → 10_000 rows per statement
        for i in 0..25_000 {
            csv.push_str(&format!("T,F{},d\n", i));
        }
        let t = parse_table(&csv)?;
        let out = insert_table(&mut conn, Dataset::DataDictionary, &t).await?;
        assert_eq!(out, LoadOutcome::Inserted(25_000));
        assert_eq!(count(&mut conn, "Data_Dictionary").await?, 25_000);
        Ok(())
    }

    #[tokio::test]
    async fn failed_insert_keeps_nothing() -> Result<()> {
        let mut conn = memory_db().await?;
        let t = parse_table("Table_Name,No_Such_Column\nSales,x\n")?;
        assert!(insert_table(&mut conn, Dataset::DataDictionary, &t).await.is_err());
        assert_eq!(count(&mut conn, "Data_Dictionary").await?, 0);
        Ok(())
    }
}
