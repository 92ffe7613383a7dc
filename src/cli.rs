use crate::adjust::{Adjustment, apply, parse_adjustments};
use crate::annotate::{IconMap, merge_icons};
use crate::collab::FlowchartDraft;
use crate::config::load_config;
use crate::deck::{Deck, build_flowchart};
use crate::registry::Registry;
use crate::snapshot::VisualRepresentation;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "flowdeck", version, about = "Flowchart text to slide shapes and connectors")]
pub struct Args {
    /// Input file (.mmd or .md) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// What to write
    #[arg(short = 'e', long = "emit", value_enum, default_value = "snapshot")]
    pub emit: Emit,

    /// JSON object mapping node ids to icons
    #[arg(long = "icons")]
    pub icons: Option<PathBuf>,

    /// JSON array of adjustment commands applied after the build
    #[arg(long = "adjust")]
    pub adjust: Option<PathBuf>,

    /// Summary text for the title slide (primitives output only)
    #[arg(long = "summary")]
    pub summary: Option<String>,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    /// Element list: id, type, text and position
    Snapshot,
    /// Flowchart text with icons merged into node labels
    Dsl,
    /// Per-slide drawing primitives for a presentation writer
    Primitives,
}

pub fn run(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let (input, is_markdown) = read_input(args.input.as_deref())?;
    let source = if is_markdown {
        extract_mermaid_blocks(&input)
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No Mermaid diagrams found in input"))?
    } else {
        input
    };

    let icons = match &args.icons {
        Some(path) => IconMap::from_json(&read_file(path)?)
            .with_context(|| format!("loading icons from {}", path.display()))?,
        None => IconMap::new(),
    };
    let adjustments = match &args.adjust {
        Some(path) => parse_adjustments(&read_file(path)?)
            .with_context(|| format!("loading adjustments from {}", path.display()))?,
        None => Vec::new(),
    };

    let rendered = match args.emit {
        Emit::Dsl => merge_icons(&source, &icons),
        Emit::Snapshot => {
            let mut registry = build_flowchart(&source, &icons, &config);
            apply_adjustments(&mut registry, &adjustments)?;
            VisualRepresentation::from_registry(&registry).to_json()?
        }
        Emit::Primitives => {
            let draft = FlowchartDraft {
                mermaid: source,
                summary: args.summary.clone().unwrap_or_default(),
            };
            let mut deck = Deck::flowchart_presentation(&draft, &icons, config);
            if let Some(registry) = deck.flowchart_mut() {
                apply_adjustments(registry, &adjustments)?;
            }
            serde_json::to_string_pretty(&deck.primitives())?
        }
    };

    write_output(&rendered, args.output.as_deref())
}

fn apply_adjustments(registry: &mut Registry, adjustments: &[Adjustment]) -> Result<()> {
    if adjustments.is_empty() {
        return Ok(());
    }
    let report = apply(registry, adjustments)?;
    info!(
        "applied {} adjustments, {} aimed at unknown ids",
        report.applied,
        report.unknown_ids.len()
    );
    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Input text plus whether it is Markdown. No path, or `-`, reads stdin.
fn read_input(path: Option<&Path>) -> Result<(String, bool)> {
    match path.filter(|path| *path != Path::new("-")) {
        Some(path) => Ok((read_file(path)?, is_markdown(path))),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading flowchart from stdin")?;
            Ok((buf, false))
        }
    }
}

fn is_markdown(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("md" | "markdown")
    )
}

fn write_output(rendered: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

fn extract_mermaid_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut in_block = false;
    let mut current = Vec::new();
    let mut fence = "";

    for line in input.lines() {
        let trimmed = line.trim();
        if !in_block {
            if let Some(start_fence) = detect_mermaid_fence(trimmed) {
                in_block = true;
                fence = start_fence;
            }
            continue;
        }
        if is_fence_end(trimmed, fence) {
            in_block = false;
            blocks.push(current.join("\n"));
            current.clear();
            continue;
        }
        current.push(line);
    }

    blocks
}

fn detect_mermaid_fence(line: &str) -> Option<&'static str> {
    for (fence, marker) in [("```", '`'), ("~~~", '~')] {
        if line.starts_with(fence) && line.trim_start_matches(marker).trim().starts_with("mermaid") {
            return Some(fence);
        }
    }
    None
}

fn is_fence_end(line: &str, fence: &str) -> bool {
    line.strip_prefix(fence)
        .is_some_and(|rest| rest.trim().is_empty())
}
