use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub bills_dir: PathBuf,
    pub draw_path: PathBuf,
    pub price_table_path: Option<PathBuf>,
}

pub fn load() -> Result<Config> {
    let bills_dir = env::var("LODE_BILLS_DIR").unwrap_or_else(|_| "./bills".to_string());
    let draw_path =
        env::var("LODE_DRAW_PATH").unwrap_or_else(|_| format!("{bills_dir}/ketqua.txt"));
    let price_table_path = env::var("LODE_PRICE_TABLE").ok().map(PathBuf::from);

    Ok(Config {
        bills_dir: PathBuf::from(bills_dir),
        draw_path: PathBuf::from(draw_path),
        price_table_path,
    })
}
