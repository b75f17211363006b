pub mod check;
pub mod config;
pub mod image;
pub mod info;
pub mod video;

use clap::Args;

use pixsort_common::config::AppConfig;
use pixsort_frame_model::SortConfig;

/// Sort flags shared by `video` and `image`. Unset flags fall back to the
/// config file.
#[derive(Debug, Clone, Default, Args)]
pub struct SortArgs {
    /// Sort axis: x (rows) or y (columns)
    #[arg(short, long)]
    pub axis: Option<String>,

    /// Sort key: channel0 or luminance
    #[arg(short, long)]
    pub key: Option<String>,

    /// Sort order: asc or desc
    #[arg(short, long)]
    pub order: Option<String>,

    /// Worker threads per frame
    #[arg(short = 't', long = "workers", alias = "threadcount")]
    pub workers: Option<usize>,
}

impl SortArgs {
    /// Overlay these flags on the configured defaults.
    pub fn resolve(&self, config: &AppConfig) -> anyhow::Result<SortConfig> {
        let mut defaults = config.sort.clone();
        if let Some(axis) = &self.axis {
            defaults.axis = axis.clone();
        }
        if let Some(key) = &self.key {
            defaults.key = key.clone();
        }
        if let Some(order) = &self.order {
            defaults.order = order.clone();
        }
        if let Some(workers) = self.workers {
            defaults.workers = workers;
        }
        Ok(SortConfig::from_defaults(&defaults)?)
    }
}
