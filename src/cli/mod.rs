use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

pub mod activate;
pub mod enrich;
pub mod poll;

pub fn read_event<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("parsing event {}", path.display()))
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
