// src/read/csv.rs
use crate::table::{Column, ColumnType, Table, Value};
use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use encoding_rs::Encoding;
use std::{fs, path::Path};
use tracing::debug;

/// Read `path`, decode it with `encoding`, and parse it into a typed `Table`.
///
/// Column names come from the header row. Bytes that do not decode cleanly
/// under `encoding`, or records with the wrong field count, fail the load.
#[tracing::instrument(level = "debug", skip(path, encoding), fields(path = %path.as_ref().display(), encoding = encoding.name()))]
pub fn load_table<P: AsRef<Path>>(path: P, encoding: &'static Encoding) -> Result<Table> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    let (text, used, had_errors) = encoding.decode(&bytes);
    if had_errors {
        bail!("{} is not valid {} text", path.display(), used.name());
    }

    parse_table(&text).with_context(|| format!("parsing CSV {}", path.display()))
}

/// Parse already-decoded CSV text into a typed `Table`.
pub fn parse_table(text: &str) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .context("reading CSV header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut raw: Vec<Vec<String>> = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error at record {}", idx + 1))?;
        raw.push(record.iter().map(|s| s.to_string()).collect());
    }
    debug!(columns = headers.len(), rows = raw.len(), "parsed CSV");

    let types: Vec<ColumnType> = (0..headers.len())
        .map(|i| infer_column_type(raw.iter().map(|r| r[i].as_str())))
        .collect();

    let rows: Vec<Vec<Value>> = raw
        .into_iter()
        .map(|r| {
            r.into_iter()
                .zip(&types)
                .map(|(cell, ty)| to_value(cell, *ty))
                .collect()
        })
        .collect();

    let columns: Vec<Column> = headers
        .into_iter()
        .zip(types)
        .map(|(name, ty)| Column { name, ty })
        .collect();

    Ok(Table::new(columns, rows))
}

/// Int if every non-empty cell parses as i64, Decimal if every one parses as
/// f64, otherwise Str. A column with no values at all is Str.
pub fn infer_column_type<'a, I>(cells: I) -> ColumnType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut all_int = true;
    let mut all_num = true;
    let mut any = false;

    for cell in cells {
        let c = cell.trim();
        if is_missing(c) {
            continue;
        }
        any = true;
        if all_int && c.parse::<i64>().is_err() {
            all_int = false;
        }
        if c.parse::<f64>().is_err() {
            all_num = false;
            break;
        }
    }

    match (any, all_int, all_num) {
        (false, _, _) => ColumnType::Str,
        (true, true, _) => ColumnType::Int,
        (true, false, true) => ColumnType::Decimal,
        _ => ColumnType::Str,
    }
}

/// Tokens read as a missing cell rather than as text.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(trimmed: &str) -> bool {
    MISSING_TOKENS.contains(&trimmed)
}

fn to_value(cell: String, ty: ColumnType) -> Value {
    let trimmed = cell.trim();
    if is_missing(trimmed) {
        return Value::Null;
    }
    match ty {
        ColumnType::Int => trimmed.parse().map(Value::Int).unwrap_or(Value::Null),
        ColumnType::Decimal => trimmed.parse().map(Value::Decimal).unwrap_or(Value::Null),
        ColumnType::Str | ColumnType::Date => Value::Str(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn infers_column_types() -> Result<()> {
        let text = "CustomerKey,Name,Zip Code,Score,Birthday\n\
                    1,Anne,78701,1.5,7/3/1939\n\
                    2,Bob,EC1A 1BB,2,\n\
                    3,,02134,,1/20/1979\n";
        let t = parse_table(text)?;

        let types: Vec<ColumnType> = t.columns.iter().map(|c| c.ty).collect();
        assert_eq!(
            types,
            vec![
                ColumnType::Int,
                ColumnType::Str,
                ColumnType::Str,
                ColumnType::Decimal,
                ColumnType::Str
            ]
        );
        assert_eq!(t.len(), 3);
        assert_eq!(t.rows[0][0], Value::Int(1));
        assert_eq!(t.rows[2][1], Value::Null);
        assert_eq!(t.rows[2][2], Value::Str("02134".into()));
        assert_eq!(t.rows[1][3], Value::Decimal(2.0));
        assert_eq!(t.rows[1][4], Value::Null);
        Ok(())
    }

    #[test]
    fn header_names_keep_spaces_inside() -> Result<()> {
        let t = parse_table("Order Number,Line Item\n366000,1\n")?;
        assert_eq!(t.column_names(), vec!["Order Number", "Line Item"]);
        Ok(())
    }

    #[test]
    fn ragged_record_is_a_parse_error() {
        assert!(parse_table("a,b\n1,2\n3\n").is_err());
    }

    #[test]
    fn missing_tokens_become_null() -> Result<()> {
        let t = parse_table("Key,Note\n1,NaN\n2,N/A\nNA,ok\n")?;
        assert_eq!(t.columns[0].ty, ColumnType::Int);
        assert_eq!(t.rows[0][1], Value::Null);
        assert_eq!(t.rows[1][1], Value::Null);
        assert_eq!(t.rows[2][0], Value::Null);
        assert_eq!(t.null_counts(), vec![1, 2]);

        let t = parse_table("Key,Note,Rate\n1,n/a,-nan\n2,#N/A,1.#QNAN\n3,<NA>,0.5\n")?;
        assert_eq!(t.columns[2].ty, ColumnType::Decimal);
        assert_eq!(t.null_counts(), vec![0, 3, 2]);
        assert_eq!(t.rows[2][2], Value::Decimal(0.5));
        Ok(())
    }

    #[test]
    fn empty_column_infers_as_str() {
        assert_eq!(infer_column_type(["", " "]), ColumnType::Str);
    }

    #[test]
    fn loads_latin1_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"Key,City\n1,K\xf6ln\n")?;
        let t = load_table(tmp.path(), encoding_rs::WINDOWS_1252)?;
        assert_eq!(t.rows[0][1], Value::Str("Köln".into()));
        Ok(())
    }

    #[test]
    fn undecodable_bytes_fail_the_load() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"Key,City\n1,K\xf6ln\n")?;
        assert!(load_table(tmp.path(), encoding_rs::UTF_8).is_err());
        Ok(())
    }
}
