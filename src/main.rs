//! searchpush - push filters and projections into search scans

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, ValueEnum};
use searchpush::planner::{LogTracer, MemoryTracer, RuleShape, Tracer};
use searchpush::{Optimizer, PushdownConfig, RelNode};
use std::path::PathBuf;

/// searchpush - rewrite a plan fragment into a single search scan
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Plan fragment to optimize (JSON)
    #[arg(short, long)]
    plan: PathBuf,

    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable only these rule shapes (repeatable)
    #[arg(short, long = "shape")]
    shapes: Vec<RuleShape>,

    /// Decline bottom projections with computed outputs
    #[arg(long)]
    strict_projections: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Print the rule trace after the result
    #[arg(long)]
    trace: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn load_config(args: &Args) -> Result<PushdownConfig> {
    let mut config = match &args.config {
        Some(path) => PushdownConfig::from_file(path)?,
        None => PushdownConfig::default(),
    };

    if !args.shapes.is_empty() {
        config.shapes = args.shapes.clone();
    }
    if args.strict_projections {
        config.strict_projections = true;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = load_config(&args)?;
    let plan = RelNode::from_file(&args.plan)?;
    let optimizer = Optimizer::new(&config);

    let memory = MemoryTracer::new();
    let tracer: &dyn Tracer = if args.trace { &memory } else { &LogTracer };

    let optimized = optimizer
        .optimize(&plan, tracer)
        .context("Failed to optimize plan")?;

    if optimized == plan {
        log::info!("no pushdown rule applied");
    }

    match args.format {
        OutputFormat::Text => {
            println!("{}", optimized.explain(0));
            if let RelNode::Scan(scan) = &optimized {
                println!();
                println!("search: {}", scan.search);
                println!("fields: {}", scan.fields.names().join(", "));
            }
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&optimized).context("Failed to serialize plan")?;
            println!("{}", json);
        }
    }

    if args.trace {
        eprintln!();
        for line in memory.lines() {
            eprintln!("trace: {}", line);
        }
    }

    Ok(())
}
