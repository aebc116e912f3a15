use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use showtech_core::{HeaderStyle, PlatformFamily};
use showtech_inventory::capture::{ParsedCapture, RawCapture};
use showtech_inventory::identify::DeviceHint;
use showtech_inventory::report::{render_detect, render_sections};

mod cli;
mod extract_cmd;

use cli::{Cli, Command, DetectArgs, OutputFormat, SectionsArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match cli.command {
        Command::Sections(args) => run_sections(args),
        Command::Detect(args) => run_detect(args),
        Command::Extract(args) => extract_cmd::run_extract(args),
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load(path: &std::path::Path, max_bytes: u64) -> Result<ParsedCapture> {
    let raw = RawCapture::read(path, max_bytes)
        .with_context(|| format!("failed to read {}", path.display()))?;
    ParsedCapture::parse(raw).with_context(|| format!("failed to segment {}", path.display()))
}

#[derive(Serialize)]
struct SectionSummary<'a> {
    command: &'a str,
    line: usize,
    style: HeaderStyle,
    lines: usize,
}

#[derive(Serialize)]
struct SectionsReport<'a> {
    source: String,
    hostname: String,
    family: PlatformFamily,
    sections: Vec<SectionSummary<'a>>,
}

fn run_sections(args: SectionsArgs) -> Result<()> {
    let parsed = load(&args.file, args.max_bytes)?;

    match args.format {
        OutputFormat::Text => println!(
            "{}",
            render_sections(&parsed.raw.display_path(), &parsed.sections)
        ),
        OutputFormat::Json => {
            let report = SectionsReport {
                source: parsed.raw.display_path(),
                hostname: parsed.hostname(),
                family: parsed.family,
                sections: parsed
                    .sections
                    .iter()
                    .map(|section| SectionSummary {
                        command: &section.command,
                        line: section.line,
                        style: section.style,
                        lines: section.body.lines().count(),
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct DetectReport {
    source: String,
    hint: DeviceHint,
    family: PlatformFamily,
    hostname: String,
    running_config: bool,
    categories: Vec<&'static str>,
}

fn run_detect(args: DetectArgs) -> Result<()> {
    let parsed = load(&args.file, args.max_bytes)?;

    match args.format {
        OutputFormat::Text => println!("{}", render_detect(&parsed)),
        OutputFormat::Json => {
            let report = DetectReport {
                source: parsed.raw.display_path(),
                hint: parsed.raw.hint,
                family: parsed.family,
                hostname: parsed.hostname(),
                running_config: parsed.config.is_some(),
                categories: parsed
                    .raw
                    .hint
                    .categories()
                    .iter()
                    .map(|category| category.title())
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
