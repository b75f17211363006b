//! Pixel-sort a single image.

use std::path::PathBuf;

use pixsort_common::config::AppConfig;
use pixsort_media::{ImageSink, ImageSource, PipelineOptions};

use super::SortArgs;

pub async fn run(
    config: &AppConfig,
    input: PathBuf,
    output: PathBuf,
    sort: SortArgs,
) -> anyhow::Result<()> {
    let options = PipelineOptions::new(sort.resolve(config)?);

    let written = output.clone();
    let summary = tokio::task::spawn_blocking(move || {
        let mut source = ImageSource::open(input)?;
        let mut sink = ImageSink::new(written);
        pixsort_media::run(&mut source, &mut sink, &options, None, None)
    })
    .await??;

    println!(
        "Sorted {}x{} image along {} -> {}",
        summary.width,
        summary.height,
        summary.sort.axis,
        output.display()
    );
    Ok(())
}
