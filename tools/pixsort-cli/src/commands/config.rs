//! Show or create the configuration file.

use pixsort_common::config::{config_file_path, AppConfig};
use pixsort_frame_model::SortConfig;

pub fn run(config: &AppConfig, init: bool) -> anyhow::Result<()> {
    let path = config_file_path();

    if init {
        if path.exists() {
            println!("Config already exists: {}", path.display());
        } else {
            let written = AppConfig::default().save()?;
            println!("Wrote default config: {}", written.display());
        }
        return Ok(());
    }

    // Surface bad sort values here rather than on the next run.
    if let Err(e) = SortConfig::from_defaults(&config.sort) {
        println!("Warning: {e}");
    }

    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
