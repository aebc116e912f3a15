use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use rayon::prelude::*;
use showtech_inventory::error::CaptureError;
use showtech_inventory::cache::CaptureCache;
use showtech_inventory::extract::{extract_cached, ExtractOptions, Inventory};
use showtech_inventory::identify::DeviceHint;
use showtech_inventory::layouts::{default_layouts, load_layouts, ColumnLayouts};
use showtech_inventory::report::render_inventory;

use crate::cli::{ExtractArgs, OutputFormat};

pub fn run_extract(args: ExtractArgs) -> Result<()> {
    let layouts = resolve_layouts(args.layouts.as_deref());
    let hint = args
        .hint
        .as_deref()
        .map(str::parse::<DeviceHint>)
        .transpose()
        .map_err(|err| anyhow!(err))?;
    let selected = args.category.categories();
    let options = ExtractOptions {
        hint,
        categories: selected.as_deref(),
        layouts: &layouts,
    };

    // A path listed twice is read and segmented once.
    let cache = CaptureCache::new(args.max_bytes);
    let results: Vec<(&PathBuf, Result<Inventory, CaptureError>)> = args
        .files
        .par_iter()
        .map(|path| (path, extract_cached(&cache, path, &options)))
        .collect();

    let mut inventories = Vec::new();
    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(inventory) => inventories.push(inventory),
            Err(err) => {
                failed += 1;
                eprintln!("error: failed to extract {}: {err}", path.display());
            }
        }
    }

    if let Some(dir) = &args.output_dir {
        write_json_files(dir, &inventories)?;
    } else {
        print_inventories(&inventories, args.format)?;
    }

    if failed > 0 {
        bail!("{failed} of {} captures failed", args.files.len());
    }
    Ok(())
}

fn resolve_layouts(path: Option<&Path>) -> ColumnLayouts {
    let Some(path) = path else {
        return default_layouts();
    };
    match load_layouts(path) {
        Ok(layouts) => layouts,
        Err(err) => {
            eprintln!("warning: {err}; using embedded layouts");
            default_layouts()
        }
    }
}

fn print_inventories(inventories: &[Inventory], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let blocks: Vec<String> = inventories.iter().map(render_inventory).collect();
            println!("{}", blocks.join("\n\n"));
        }
        OutputFormat::Json => {
            let json = match inventories {
                [single] => serde_json::to_string_pretty(single)?,
                many => serde_json::to_string_pretty(many)?,
            };
            println!("{json}");
        }
    }
    Ok(())
}

fn write_json_files(dir: &Path, inventories: &[Inventory]) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let mut used = HashSet::new();
    for inventory in inventories {
        let stem = unique_stem(&file_stem(inventory.hostname()), &mut used);
        let out_path = dir.join(format!("{stem}.json"));
        let json = serde_json::to_string_pretty(inventory)?;
        fs::write(&out_path, json)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        println!("wrote {}", out_path.display());
    }
    Ok(())
}

fn file_stem(hostname: &str) -> String {
    hostname
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Captures sharing a hostname get `-2`, `-3`, ... suffixes.
fn unique_stem(stem: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = stem.to_string();
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{stem}-{n}");
        n += 1;
    }
    candidate
}
