use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, bail};
use log::info;
use noshow_prep::utils::logging::console::{print_schema_info, print_shape};
use noshow_prep::utils::logging::{create_spinner, finish_and_clear};
use noshow_prep::{PreprocessConfig, Preprocessor, read_dataset, write_dataset};

const USAGE: &str = "usage: noshow-prep <input.csv> [output.{csv,parquet}] [config.json]";

/// `processed_<input file name>` next to the input
fn default_output(input: &Path) -> anyhow::Result<PathBuf> {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("input path {} has no file name", input.display()))?;
    Ok(input.with_file_name(format!("processed_{name}")))
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.len() > 3 {
        bail!(USAGE);
    }

    let input = PathBuf::from(&args[0]);
    let output = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => default_output(&input)?,
    };
    let config = match args.get(2) {
        Some(path) => PreprocessConfig::from_json_file(Path::new(path))
            .with_context(|| format!("loading configuration from {path}"))?,
        None => PreprocessConfig::default(),
    };
    let preprocessor = Preprocessor::new(config).context("invalid configuration")?;

    let start = Instant::now();
    let raw = read_dataset(&input).with_context(|| format!("reading {}", input.display()))?;

    let spinner = create_spinner(Some("Preprocessing appointments..."));
    let result = preprocessor.run(&raw);
    finish_and_clear(&spinner);
    let output_data = result.context("preprocessing failed")?;

    write_dataset(&output, &output_data.dataset.batch)
        .with_context(|| format!("writing {}", output.display()))?;

    println!("Preprocessing complete:");
    print_shape("Input", &raw);
    print_shape("Output", &output_data.dataset.batch);
    println!();
    print!("{}", output_data.cleaning.summary());
    println!();
    print_schema_info(&output_data.dataset.batch);

    info!(
        "Wrote {} to {} in {:?}",
        output_data.dataset.summary,
        output.display(),
        start.elapsed()
    );
    Ok(())
}
