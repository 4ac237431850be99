// src/config.rs
use crate::dataset::Dataset;
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Config file read from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "retail_etl.toml";
/// Environment override prefix, e.g. `RETAIL_ETL_DATABASE__PASSWORD`.
pub const ENV_PREFIX: &str = "RETAIL_ETL_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub files: DatasetFiles,
    /// Rows shown in the post-cleaning preview.
    pub preview_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            files: DatasetFiles::default(),
            preview_rows: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL. Takes precedence over the individual fields.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".into(),
            port: 3306,
            name: None,
            user: None,
            password: None,
        }
    }
}

impl DatabaseConfig {
    /// Connection URL: `url` verbatim, else a `mysql://` URL with the user and
    /// password percent-encoded.
    pub fn connection_url(&self) -> Result<String> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }

        let (Some(name), Some(user), Some(password)) = (&self.name, &self.user, &self.password)
        else {
            bail!("database name, user and password must all be configured (or set database.url)");
        };

        let mut url = Url::parse(&format!("mysql://{}:{}/", self.host, self.port))
            .with_context(|| format!("invalid database host `{}`", self.host))?;
        url.set_username(user)
            .map_err(|_| anyhow::anyhow!("cannot set database user on URL"))?;
        url.set_password(Some(password))
            .map_err(|_| anyhow::anyhow!("cannot set database password on URL"))?;
        url.set_path(name);
        Ok(url.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFiles {
    pub customer: PathBuf,
    pub sales: PathBuf,
    pub products: PathBuf,
    pub exchange_rates: PathBuf,
    pub data_dictionary: PathBuf,
}

impl Default for DatasetFiles {
    fn default() -> Self {
        Self {
            customer: "data/Customers.csv".into(),
            sales: "data/Sales.csv".into(),
            products: "data/Products.csv".into(),
            exchange_rates: "data/Exchange_Rates.csv".into(),
            data_dictionary: "data/Data_Dictionary.csv".into(),
        }
    }
}

impl DatasetFiles {
    pub fn path(&self, dataset: Dataset) -> &Path {
        match dataset {
            Dataset::Customer => &self.customer,
            Dataset::Sales => &self.sales,
            Dataset::Products => &self.products,
            Dataset::ExchangeRates => &self.exchange_rates,
            Dataset::DataDictionary => &self.data_dictionary,
        }
    }
}

/// Layered load, lowest to highest priority: built-in defaults, the TOML file
/// (`path`, or `retail_etl.toml` if it exists), `RETAIL_ETL_*` environment.
///
/// A `.env` file, if present, is loaded into the environment first.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let _ = dotenvy::dotenv();

    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    match path {
        Some(p) => {
            if !p.is_file() {
                bail!("config file {} not found", p.display());
            }
            figment = figment.merge(Toml::file(p));
        }
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                figment = figment.merge(Toml::file(default));
            }
        }
    }
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    figment.extract().context("loading configuration")
}
