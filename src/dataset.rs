// src/dataset.rs
use anyhow::{anyhow, Error};
use std::{fmt, str::FromStr};

/// The five fixed datasets. Each one selects its cleaning rules, DDL and key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dataset {
    Customer,
    Sales,
    Products,
    ExchangeRates,
    DataDictionary,
}

/// Everything that varies between datasets, as data.
#[derive(Debug)]
pub struct DatasetSpec {
    /// Destination table name; also the label used in log lines.
    pub table: &'static str,
    /// Single-column primary key. Drives in-batch dedup and the existing-key scan.
    pub primary_key: Option<&'static str>,
    /// `MM/DD/YYYY` text columns rewritten as dates.
    pub date_columns: &'static [&'static str],
    /// `$1,234.50`-style text columns rewritten as decimals.
    pub currency_columns: &'static [&'static str],
    pub create_sql: &'static str,
}

impl Dataset {
    /// Processing order. Parents come before `Sales` so its foreign keys resolve.
    pub const ALL: [Dataset; 5] = [
        Dataset::Customer,
        Dataset::Products,
        Dataset::Sales,
        Dataset::ExchangeRates,
        Dataset::DataDictionary,
    ];

    pub fn spec(self) -> &'static DatasetSpec {
        match self {
            Dataset::Customer => &CUSTOMER,
            Dataset::Sales => &SALES,
            Dataset::Products => &PRODUCTS,
            Dataset::ExchangeRates => &EXCHANGE_RATES,
            Dataset::DataDictionary => &DATA_DICTIONARY,
        }
    }

    pub fn table_name(self) -> &'static str {
        self.spec().table
    }

    pub fn primary_key(self) -> Option<&'static str> {
        self.spec().primary_key
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for Dataset {
    type Err = Error;

    /// Accepts the table label case-insensitively, with `-` or `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Dataset::ALL
            .into_iter()
            .find(|d| d.table_name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| anyhow!("unknown dataset `{}`", s))
    }
}

static CUSTOMER: DatasetSpec = DatasetSpec {
    table: "Customer",
    primary_key: Some("CustomerKey"),
    date_columns: &["Birthday"],
    currency_columns: &[],
    create_sql: r#"
            CREATE TABLE IF NOT EXISTS `Customer` (
                `CustomerKey` INT PRIMARY KEY,
                `Gender` VARCHAR(10),
                `Name` VARCHAR(255),
                `City` VARCHAR(100),
                `State Code` VARCHAR(50),
                `State` VARCHAR(100),
                `Zip Code` VARCHAR(20),
                `Country` VARCHAR(100),
                `Continent` VARCHAR(100),
                `Birthday` DATE
            )
        "#,
};

static SALES: DatasetSpec = DatasetSpec {
    table: "Sales",
    primary_key: Some("Order Number"),
    date_columns: &["Order Date", "Delivery Date"],
    currency_columns: &[],
    create_sql: r#"
            CREATE TABLE IF NOT EXISTS `Sales` (
                `Order Number` INT PRIMARY KEY,
                `Line Item` INT,
                `Order Date` DATE,
                `Delivery Date` DATE,
                `CustomerKey` INT,
                `StoreKey` INT,
                `ProductKey` INT,
                `Quantity` INT,
                `Currency Code` VARCHAR(10),
                FOREIGN KEY (`CustomerKey`) REFERENCES `Customer`(`CustomerKey`),
                FOREIGN KEY (`ProductKey`) REFERENCES `Products`(`ProductKey`)
            )
        "#,
};

static PRODUCTS: DatasetSpec = DatasetSpec {
    table: "Products",
    primary_key: Some("ProductKey"),
    date_columns: &[],
    currency_columns: &["Unit Cost USD", "Unit Price USD"],
    create_sql: r#"
            CREATE TABLE IF NOT EXISTS `Products` (
                `ProductKey` INT PRIMARY KEY,
                `Product Name` VARCHAR(255),
                `Brand` VARCHAR(100),
                `Color` VARCHAR(50),
                `Unit Cost USD` DECIMAL(10, 2),
                `Unit Price USD` DECIMAL(10, 2),
                `SubcategoryKey` INT,
                `Subcategory` VARCHAR(100),
                `CategoryKey` INT,
                `Category` VARCHAR(100)
            )
        "#,
};

static EXCHANGE_RATES: DatasetSpec = DatasetSpec {
    table: "Exchange_Rates",
    primary_key: None,
    date_columns: &["Date"],
    currency_columns: &[],
    create_sql: r#"
            CREATE TABLE IF NOT EXISTS `Exchange_Rates` (
                `Date` DATE,
                `Currency` VARCHAR(10),
                `Exchange` DECIMAL(10, 4),
                PRIMARY KEY (`Date`, `Currency`)
            )
        "#,
};

static DATA_DICTIONARY: DatasetSpec = DatasetSpec {
    table: "Data_Dictionary",
    primary_key: None,
    date_columns: &[],
    currency_columns: &[],
    create_sql: r#"
            CREATE TABLE IF NOT EXISTS `Data_Dictionary` (
                `Table_Name` VARCHAR(100),
                `Field_Name` VARCHAR(100),
                `Description` TEXT
            )
        "#,
};
