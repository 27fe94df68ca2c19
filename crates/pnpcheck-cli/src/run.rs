use std::path::PathBuf;

use indexmap::IndexSet;
use tracing::{info, warn};

use pnpcheck_centroid::{designator_class, distinct_packages, parse_file};
use pnpcheck_footprint::{resolve, KicadLoader};
use pnpcheck_render::{assign_colors, render_to_file, RenderOptions, Side};

use crate::error::CliError;
use crate::Cli;

pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.top.is_none() && cli.bottom.is_none() {
        return Err(CliError::usage(
            "at least one of --top or --bottom is required",
        ));
    }
    if cli.libs.is_empty() {
        return Err(CliError::usage("at least one --lib location is required"));
    }

    let records = parse_file(&cli.input)?;
    info!(records = records.len(), input = %cli.input.display(), "parsed centroid file");
    println!("Parsed {} placements from {}", records.len(), cli.input.display());

    let packages = distinct_packages(&records);
    let mut loader = KicadLoader;
    let geometries = resolve(&packages, &cli.libs, &mut loader);

    let unresolved: Vec<&str> = packages
        .iter()
        .map(String::as_str)
        .filter(|package| !geometries.contains_key(*package))
        .collect();
    if !unresolved.is_empty() {
        warn!(
            packages = %unresolved.join(", "),
            "packages without a matching footprint will be skipped"
        );
        println!(
            "Warning: no footprint found for {} package(s): {}",
            unresolved.len(),
            unresolved.join(", ")
        );
    }

    let classes: IndexSet<&str> = records
        .iter()
        .filter_map(|record| record.reference())
        .map(designator_class)
        .collect();
    let colors = assign_colors(classes);

    let opts = RenderOptions::default();
    let outputs: [(Side, Option<&PathBuf>); 2] = [
        (Side::Top, cli.top.as_ref()),
        (Side::Bottom, cli.bottom.as_ref()),
    ];

    for (side, path) in outputs {
        let Some(path) = path else { continue };
        let report = render_to_file(&records, &geometries, &colors, side, path, &opts)?;
        println!(
            "{side}: {} drawn, {} skipped -> {}",
            report.drawn,
            report.skipped,
            path.display()
        );
    }

    Ok(())
}
