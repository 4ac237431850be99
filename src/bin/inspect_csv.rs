use retail_etl::{
    clean::{clean_table, report::preview_lines},
    read::{detect_encoding, load_table},
    Dataset,
};
use std::{env, path::Path, process::exit};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    // Expect exactly two CLI arguments: dataset label and CSV path.
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <DATASET> <CSV_FILE>", args[0]);
        eprintln!("  DATASET: Customer | Sales | Products | Exchange_Rates | Data_Dictionary");
        exit(1);
    }

    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let dataset: Dataset = match args[1].parse() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };
    if let Err(e) = inspect_csv(dataset, Path::new(&args[2])) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Print the raw shape of the file, then clean it as `dataset` and print the result.
fn inspect_csv(dataset: Dataset, path: &Path) -> anyhow::Result<()> {
    let encoding = detect_encoding(path)?;
    let raw = load_table(path, encoding)?;

    println!("=== CSV File: {} ===", path.display());
    println!("Encoding:      {}", encoding.name());
    println!("Dataset:       {}", dataset);
    println!("Rows (raw):    {}", raw.len());
    println!();

    println!("=== Raw columns ===");
    for (col, nulls) in raw.columns.iter().zip(raw.null_counts()) {
        println!("- {:<30} | {:<8} | nulls: {}", col.name, col.ty, nulls);
    }
    println!();

    println!("=== Raw preview ===");
    for line in preview_lines(&raw, 5) {
        println!("{}", line);
    }
    println!();

    let cleaned = clean_table(dataset, raw.clone(), 5)?;
    println!("=== Cleaned ({} rows) ===", cleaned.len());
    for (col, nulls) in cleaned.columns.iter().zip(cleaned.null_counts()) {
        println!("- {:<30} | {:<8} | nulls: {}", col.name, col.ty, nulls);
    }
    Ok(())
}
