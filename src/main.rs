//! Destiny Matrix CLI
//!
//! Usage:
//!   destiny-matrix --input chart.json                     # Colored report
//!   destiny-matrix --input chart.json --json              # JSON result
//!   destiny-matrix --input chart.json --events            # Add calendar events
//!   destiny-matrix --input chart.json --anchor 2025-03 --horizon 24
//!   cat chart.json | destiny-matrix                       # Input from stdin

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::Read;
use std::path::PathBuf;

use destiny_matrix::core::{project_calendar_events, CalendarLimits, MatrixEngine, TableRegistry, TableSet};
use destiny_matrix::types::{CalendarEvent, Grade, MatrixInput, MatrixResult, PeakLevel};
use destiny_matrix::{FusionConfig, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "destiny-matrix",
    version = VERSION,
    about = "Destiny Matrix - fuse a Four Pillars profile with a Western chart",
    long_about = "Scores five life domains (career, love, money, health, relocation)\n\
                  from a combined Four Pillars + Western chart input and projects\n\
                  a monthly overlap timeline.\n\n\
                  Peak levels:\n  \
                  NORMAL    - No notable timing overlap\n  \
                  ELEVATED  - Concurrent cycles reinforce the domain\n  \
                  PEAK      - Strong concurrent reinforcement"
)]
struct Args {
    /// MatrixInput JSON file (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Interaction table document replacing the built-in tables
    #[arg(long)]
    tables: Option<PathBuf>,

    /// FusionConfig JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Anchor month (YYYY-MM), overrides the input's anchor
    #[arg(short, long)]
    anchor: Option<String>,

    /// Timeline horizon in months (1-60)
    #[arg(long)]
    horizon: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Debug logging and per-domain breakdown
    #[arg(short, long)]
    verbose: bool,

    /// Project calendar events from the domain timelines
    #[arg(long)]
    events: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so --json output stays parseable
    if args.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    if args.no_color {
        colored::control::set_override(false);
    }

    let mut config = match &args.config {
        Some(path) => FusionConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FusionConfig::default(),
    };
    if let Some(horizon) = args.horizon {
        config.horizon_months = horizon;
        config.validate().context("invalid --horizon")?;
    }

    if let Some(path) = &args.tables {
        let tables = TableSet::load(path)
            .with_context(|| format!("loading tables {}", path.display()))?;
        TableRegistry::reload(tables);
    }

    let mut input = read_input(args.input.as_ref())?;
    if let Some(anchor) = &args.anchor {
        input.anchor_month = Some(anchor.clone());
    }

    let engine = MatrixEngine::new(TableRegistry::current(), config).context("invalid fusion config")?;
    let result = engine.calculate(&input)?;
    let events = if args.events {
        project_calendar_events(&result, CalendarLimits::default())
    } else {
        Vec::new()
    };

    if args.json {
        #[derive(serde::Serialize)]
        struct Output<'a> {
            result: &'a MatrixResult,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            events: Vec<CalendarEvent>,
        }
        let output = Output {
            result: &result,
            events,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_header(&result, args.no_color);
    print_domains(&result, args.verbose);
    print_labels(&result);
    print_timeline(&result, args.no_color);
    if args.events {
        println!();
        println!("{}", "Calendar".bold());
        if events.is_empty() {
            println!("  {}", "no elevated months".dimmed());
        }
        for event in &events {
            println!(
                "  {}  {:<24} strength={:.2} weight={:.3}",
                event.month,
                event.title,
                event.overlap_strength,
                event.time_overlap_weight
            );
        }
    }
    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<MatrixInput> {
    let json = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading input {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading input from stdin")?;
            buffer
        }
    };
    serde_json::from_str(&json).context("input is not a valid MatrixInput document")
}

fn print_header(result: &MatrixResult, no_color: bool) {
    println!("{}", format!("Destiny Matrix v{}", VERSION).bold());
    println!(
        "{}",
        format!("tables {} ({})", result.table_version, &result.table_digest[..12]).dimmed()
    );
    println!();

    let (color, reset) = if no_color {
        ("", "")
    } else {
        (result.grade.color_code(), "\x1b[0m")
    };
    println!(
        "Overall {}{:.1}  grade {}{}",
        color, result.overall_score, result.grade, reset
    );
    if result.grade == Grade::D {
        println!("  {}", "cautions outweigh drivers this period".yellow());
    }
    println!();
}

fn print_domains(result: &MatrixResult, verbose: bool) {
    for score in result.domain_scores.values() {
        println!(
            "  {} {:>5.1}  confidence {:>3.0}%",
            format!("{:<11}", score.domain.title()).bold(),
            score.final_score_adjusted,
            score.confidence_score * 100.0
        );
        if verbose {
            println!("    {}", score.to_parseable_string().dimmed());
            for evidence in &score.evidence {
                println!(
                    "    {} {}[{}][{}] {} {}",
                    "·".dimmed(),
                    evidence.layer,
                    evidence.key_a,
                    evidence.key_b,
                    evidence.score,
                    evidence.label
                );
            }
        }
    }
    println!();
}

fn print_labels(result: &MatrixResult) {
    for driver in &result.drivers {
        println!("  {} {}", "+".green(), driver);
    }
    for caution in &result.cautions {
        println!("  {} {}", "-".red(), caution);
    }
    println!();
}

fn print_timeline(result: &MatrixResult, no_color: bool) {
    println!("{}", "Timeline".bold());
    for point in &result.overlap_timeline {
        let (color, reset) = if no_color {
            ("", "")
        } else {
            (point.peak_level.color_code(), PeakLevel::color_reset())
        };
        println!(
            "  {}  {}{:<8}{} strength={:.2} weight={:.3}",
            point.month, color, point.peak_level.to_string(), reset, point.overlap_strength, point.time_overlap_weight
        );
    }
}
