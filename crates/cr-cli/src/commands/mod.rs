pub mod classify;
pub mod markers;
pub mod rating;
pub mod redact;

use anyhow::{Result, bail};
use cr_config::Config;
use cr_core::UnitId;
use cr_engine::RatingEngine;
use cr_storage::SqliteBackend;

pub type Engine = RatingEngine<SqliteBackend>;

/// Validate a unit id given on the command line
pub fn parse_unit(id: i64) -> Result<UnitId> {
    match UnitId::new(id) {
        Some(unit) => Ok(unit),
        None => bail!("not a valid content unit id: {}", id),
    }
}

pub fn show_config(config: &Config) -> Result<()> {
    println!("# {}", Config::config_path().display());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
