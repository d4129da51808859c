pub mod curve;
pub mod schedule;

use anyhow::Result;
use serde_json::Value;

pub(crate) fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
