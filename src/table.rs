// src/table.rs
use chrono::NaiveDate;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single cell. `Null` is the explicit marker for missing or unparsable data.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Int(i64),
    Decimal(f64),
    Str(String),
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text form of a non-null cell, as it would read back out of a CSV.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Str(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

// Decimals compare by bit pattern so a `Value` can key a `HashSet`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Int(i) => i.hash(state),
            Value::Decimal(f) => f.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
            Value::Date(d) => d.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Str(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Decimal,
    Str,
    Date,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Int => "int64",
            ColumnType::Decimal => "float64",
            ColumnType::Str => "object",
            ColumnType::Date => "date",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

/// An in-memory row set: ordered named columns and the rows beneath them.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<Column>,
    /// Every row holds exactly `columns.len()` cells.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Null count per column, in column order.
    pub fn null_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.columns.len()];
        for row in &self.rows {
            for (i, v) in row.iter().enumerate() {
                if v.is_null() {
                    counts[i] += 1;
                }
            }
        }
        counts
    }

    /// Keep the first row for each distinct value of column `idx`.
    pub fn dedup_by_column(&mut self, idx: usize) -> usize {
        let mut seen = std::collections::HashSet::new();
        let before = self.rows.len();
        self.rows.retain(|row| seen.insert(row[idx].clone()));
        before - self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec![
                Column {
                    name: "Key".into(),
                    ty: ColumnType::Int,
                },
                Column {
                    name: "Name".into(),
                    ty: ColumnType::Str,
                },
            ],
            vec![
                vec![Value::Int(1), Value::Str("a".into())],
                vec![Value::Int(2), Value::Null],
                vec![Value::Int(1), Value::Str("b".into())],
                vec![Value::Null, Value::Null],
                vec![Value::Null, Value::Str("c".into())],
            ],
        )
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut t = sample();
        let dropped = t.dedup_by_column(0);
        assert_eq!(dropped, 2);
        assert_eq!(t.len(), 3);
        assert_eq!(t.rows[0][1], Value::Str("a".into()));
        assert_eq!(t.rows[2][0], Value::Null);
        assert_eq!(t.rows[2][1], Value::Null);
    }

    #[test]
    fn null_counts_per_column() {
        let t = sample();
        assert_eq!(t.null_counts(), vec![2, 2]);
    }

    #[test]
    fn date_displays_iso() {
        let d = NaiveDate::from_ymd_opt(1995, 7, 3).unwrap();
        assert_eq!(Value::Date(d).to_string(), "1995-07-03");
        assert_eq!(Value::Date(d).as_text().as_deref(), Some("1995-07-03"));
        assert_eq!(Value::Null.as_text(), None);
    }
}
