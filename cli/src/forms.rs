//! `key:value` forms shared by the subcommands and the TUI input line.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use dailyusage_core::input::{parse_flag, parse_number};
use dailyusage_core::time::{self, parse_day};
use dailyusage_core::{normalize_metadata, parse_args, parse_known_args, Item, ManualEntry};

pub const ITEM_KEYS: [&str; 4] = ["unit", "rate", "provider", "routine"];
pub const LOG_KEYS: [&str; 3] = ["date", "provider", "note"];

/// `Milk unit:liter rate:2.5 [provider:Dairy] [routine:no]`
pub fn build_item(args: &[String]) -> Result<Item> {
    let parsed = parse_args(args);
    let metadata = normalize_metadata(parsed.metadata, &ITEM_KEYS)?;

    let unit = metadata
        .get("unit")
        .cloned()
        .ok_or_else(|| anyhow!("unit:<label> is required"))?;
    let rate = metadata
        .get("rate")
        .map(|r| parse_number("rate", r))
        .transpose()?
        .ok_or_else(|| anyhow!("rate:<number> is required"))?;

    let mut item = Item::new(parsed.name, unit, rate);
    apply_item_metadata(&mut item, &metadata)?;
    Ok(item)
}

/// Free words rename the item; known keys overwrite fields.
pub fn edit_item(item: &mut Item, args: &[String]) -> Result<()> {
    let parsed = parse_args(args);
    let metadata = normalize_metadata(parsed.metadata, &ITEM_KEYS)?;
    if !parsed.name.is_empty() {
        item.name = parsed.name;
    }
    apply_item_metadata(item, &metadata)
}

/// An empty provider clears it.
pub fn apply_item_metadata(item: &mut Item, metadata: &HashMap<String, String>) -> Result<()> {
    for (key, value) in metadata {
        match key.as_str() {
            "unit" => item.unit = value.clone(),
            "rate" => item.rate = parse_number("rate", value)?,
            "provider" => {
                item.provider = if value.trim().is_empty() { None } else { Some(value.clone()) };
            }
            "routine" => item.is_routine = parse_flag(value)?,
            _ => {}
        }
    }
    Ok(())
}

/// `[date:<day>] [provider:<p>] [note:<text>] [free words…]`
///
/// Unrecognised `a:b` words, like a clock time, are part of the note.
pub fn build_manual_entry(quantity: f64, args: &[String]) -> Result<ManualEntry> {
    let parsed = parse_known_args(args, &LOG_KEYS);
    let metadata = parsed.metadata;

    let date = match metadata.get("date") {
        Some(d) => parse_day(d, time::today())?,
        None => time::today(),
    };
    let mut entry = ManualEntry::new(date, quantity);
    entry.provider = metadata.get("provider").cloned();
    entry.note = match metadata.get("note") {
        Some(note) if parsed.name.is_empty() => Some(note.clone()),
        Some(note) => Some(format!("{} {}", note, parsed.name)),
        None if !parsed.name.is_empty() => Some(parsed.name),
        None => None,
    };
    Ok(entry)
}
