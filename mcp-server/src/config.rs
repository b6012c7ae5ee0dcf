use anyhow::Result;
use lode_lib::PriceTable;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub price_table_path: Option<PathBuf>,
}

pub fn load() -> Result<Config> {
    let price_table_path = env::var("LODE_PRICE_TABLE").ok().map(PathBuf::from);

    Ok(Config { price_table_path })
}

impl Config {
    /// The configured price table, or the standard one.
    pub fn price_table(&self) -> Result<PriceTable> {
        Ok(PriceTable::load(self.price_table_path.as_deref())?)
    }
}
