// src/clean/mod.rs
pub mod currency;
pub mod date_parser;
pub mod report;

use crate::dataset::Dataset;
use crate::table::{ColumnType, Table, Value};
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("column `{column}` not present")]
    MissingColumn { column: String },
    #[error("could not convert string to float in column `{column}`: {value:?}")]
    NotNumeric { column: String, value: String },
}

/// Apply `dataset`'s normalization rules to `table` and log diagnostics.
///
/// Rules run in a fixed order: null normalization, primary-key dedup (keep
/// first), `MM/DD/YYYY` date columns, currency columns. Column names and order
/// never change; only values and row count do.
///
/// A missing key or date column is an error and the dataset is dropped. A
/// currency failure is not: it is logged and every currency column of the
/// dataset is left as text.
#[tracing::instrument(level = "info", skip_all, fields(dataset = %dataset))]
pub fn clean_table(
    dataset: Dataset,
    mut table: Table,
    preview_rows: usize,
) -> Result<Table, CleanError> {
    info!("processing {} data", dataset);
    let spec = dataset.spec();

    normalize_nulls(&mut table);

    if let Some(key) = spec.primary_key {
        let idx = table
            .column_index(key)
            .ok_or_else(|| CleanError::MissingColumn {
                column: key.to_string(),
            })?;
        let dropped = table.dedup_by_column(idx);
        debug!(key, dropped, "dropped duplicate rows");
    }

    for column in spec.date_columns {
        convert_date_column(&mut table, column)?;
    }

    if let Err(e) = convert_currency_columns(&mut table, spec.currency_columns) {
        error!("error converting decimal columns in {}: {}", dataset, e);
    }

    report::log_diagnostics(dataset.table_name(), &table, preview_rows);
    Ok(table)
}

/// NaN decimals become the null marker. Infinities are real values and stay.
fn normalize_nulls(table: &mut Table) {
    for row in &mut table.rows {
        for v in row.iter_mut() {
            if matches!(v, Value::Decimal(f) if f.is_nan()) {
                *v = Value::Null;
            }
        }
    }
}

/// Convert every column in `columns`, or none of them.
///
/// Each column is checked before any is rewritten, so the first failure
/// leaves the whole set untouched.
pub fn convert_currency_columns(table: &mut Table, columns: &[&str]) -> Result<(), CleanError> {
    let mut staged = table.clone();
    for column in columns {
        convert_currency_column(&mut staged, column)?;
    }
    *table = staged;
    Ok(())
}

/// Rewrite `column` as dates. Unparsable or missing text becomes null.
pub fn convert_date_column(table: &mut Table, column: &str) -> Result<(), CleanError> {
    let idx = table
        .column_index(column)
        .ok_or_else(|| CleanError::MissingColumn {
            column: column.to_string(),
        })?;

    let mut failed = 0usize;
    for row in &mut table.rows {
        let parsed = row[idx]
            .as_text()
            .and_then(|s| date_parser::parse_mdy(&s));
        if parsed.is_none() && !row[idx].is_null() {
            failed += 1;
        }
        row[idx] = parsed.map(Value::Date).unwrap_or(Value::Null);
    }
    table.columns[idx].ty = ColumnType::Date;

    if failed > 0 {
        debug!(column, failed, "unparsable dates set to null");
    }
    Ok(())
}

/// Rewrite `column` as decimals after stripping `$` and `,`.
///
/// All-or-nothing: if any non-null cell fails to parse, the column is left
/// exactly as it was and the first offending value is reported.
pub fn convert_currency_column(table: &mut Table, column: &str) -> Result<(), CleanError> {
    let idx = table
        .column_index(column)
        .ok_or_else(|| CleanError::MissingColumn {
            column: column.to_string(),
        })?;

    let mut converted = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let v = match &row[idx] {
            Value::Null => Value::Null,
            Value::Int(i) => Value::Decimal(*i as f64),
            Value::Decimal(f) => Value::Decimal(*f),
            other => {
                let text = other.as_text().unwrap_or_default();
                match currency::parse_currency(&text) {
                    Some(f) => Value::Decimal(f),
                    None => {
                        return Err(CleanError::NotNumeric {
                            column: column.to_string(),
                            value: text,
                        })
                    }
                }
            }
        };
        converted.push(v);
    }

    for (row, v) in table.rows.iter_mut().zip(converted) {
        row[idx] = v;
    }
    table.columns[idx].ty = ColumnType::Decimal;
    Ok(())
}
