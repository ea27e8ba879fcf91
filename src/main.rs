// src/main.rs

//! `gridconv <input.ppm> <output.ppm> [preset]`
//!
//! Reads a binary PPM, convolves it with the named preset (or the kernel
//! from the configuration) and writes the result as a binary PPM.

use anyhow::{bail, Context};
use gridconv::config::{KernelConfig, CONFIG};
use gridconv::convolution::convolve_parallel;
use gridconv::image;
use gridconv::kernels::KernelPreset;
use log::{info, warn};
use std::fs::File;
use std::io::{BufReader, BufWriter};

const USAGE: &str = "usage: gridconv <input.ppm> <output.ppm> [preset]";

fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (input, output, preset) = match args.as_slice() {
        [input, output] => (input, output, None),
        [input, output, preset] => (input, output, Some(preset)),
        _ => bail!(USAGE),
    };

    let config = &*CONFIG;
    let kernel_config = match preset {
        Some(name) => KernelConfig::Preset(
            name.parse::<KernelPreset>()
                .with_context(|| format!("Invalid preset argument {:?}", name))?,
        ),
        None => config.convolution.kernel.clone(),
    };
    let kernel = kernel_config.build().context("Failed to build kernel")?;
    info!("Kernel {}x{}: {:?}", kernel.width(), kernel.height(), kernel_config);

    // --- Input ---
    let file = File::open(input).with_context(|| format!("Failed to open {}", input))?;
    let source_image =
        image::read_ppm(BufReader::new(file)).with_context(|| format!("Failed to read {}", input))?;
    let source = image::grid_from_image(&source_image).context("Failed to build source grid")?;
    info!("Read {}x{} image from {}", source.width(), source.height(), input);

    // --- Convolution ---
    let options = config.convolution.options();
    let result = convolve_parallel(&source, Some(&kernel), options).context("Convolution failed")?;
    info!("Convolved with {} thread(s)", options.num_threads.max(1));

    // --- Output ---
    if config.output.clamp_warning {
        let clamped = image::out_of_range_cells(&result);
        if clamped > 0 {
            warn!("{} output cells were clamped into 0..=255", clamped);
        }
    }
    let out_image = image::image_from_grid(&result).context("Failed to convert result grid")?;
    let file = File::create(output).with_context(|| format!("Failed to create {}", output))?;
    image::write_ppm(BufWriter::new(file), &out_image)
        .with_context(|| format!("Failed to write {}", output))?;
    info!("Wrote {}", output);

    Ok(())
}
