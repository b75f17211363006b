//! Check system capabilities.

use pixsort_frame_model::WorkerCount;
use pixsort_media::command_exists;

pub fn run() -> anyhow::Result<()> {
    println!("Pixsort System Check");
    println!("{}", "=".repeat(50));

    let mut all_ok = true;
    let tools = [
        ("ffmpeg", "decode and encode video"),
        ("ffprobe", "read video properties"),
    ];
    for (binary, purpose) in tools {
        if command_exists(binary) {
            println!("[OK] {binary}: found");
        } else {
            all_ok = false;
            println!("[MISSING] {binary}: needed to {purpose}");
        }
    }

    let cores = WorkerCount::available_parallelism();
    println!("[OK] CPU threads available: {}", cores.get());

    println!();
    if all_ok {
        println!("ffmpeg is available. Video sorting is ready.");
    } else {
        println!("Install ffmpeg to sort videos. Still images work without it.");
    }

    Ok(())
}
