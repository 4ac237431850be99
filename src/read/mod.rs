pub mod csv;
pub mod encoding;

pub use self::csv::{infer_column_type, load_table, parse_table};
pub use self::encoding::detect_encoding;
