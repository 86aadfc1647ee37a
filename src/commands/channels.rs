use anyhow::{Context, Result};

use freebox_select::channels::ChannelTable;
use freebox_select::config::Config;

pub fn channels(config: &Config, label: Option<&str>) -> Result<()> {
    let table = ChannelTable::load(config.storage.channels_file.as_deref())
        .context("Failed to load channel table")?;

    match label {
        Some(label) => match table.resolve(label) {
            Some(number) => println!("{label} -> {number}"),
            None => anyhow::bail!("Channel '{label}' is not in the channel table"),
        },
        None => {
            println!("Channel table ({} entries)", table.len());
            println!("=========================");
            for (label, number) in table.iter() {
                println!("  {label:<20} {number}");
            }
        }
    }

    Ok(())
}
