use anyhow::{Context, Result};
use clap::Parser;
use hintlet::cli::{Cli, OutputFormat};
use hintlet::config::HintletConfig;
use hintlet::csv_output::CsvOutput;
use hintlet::engine::HintletEngine;
use hintlet::hint::{HintSink, HintSummary, SummarySink, TextSink};
use hintlet::json_output::JsonOutput;
use hintlet::replay::{replay, ReplayStats};
use hintlet::rules::{builtin_rule, register_builtin_rules, BUILTIN_RULE_IDS};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
///
/// Without `--debug` only warnings (malformed lines, failing rules) reach stderr.
fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::TRACE
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();
}

/// Load the config file if given and apply the --rules override
fn load_config(args: &Cli) -> Result<HintletConfig> {
    let mut config = match &args.config {
        Some(path) => HintletConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => HintletConfig::default(),
    };
    if let Some(rules) = &args.rules {
        config.enabled_rules = Some(rules.clone());
        config.validate().context("Invalid --rules")?;
    }
    Ok(config)
}

fn open_input(args: &Cli) -> Result<Box<dyn BufRead>> {
    if args.reads_stdin() {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let path = args
        .input
        .as_ref()
        .context("Missing INPUT trace file. Usage: hintlet TRACE.jsonl")?;
    let file =
        File::open(path).with_context(|| format!("Failed to open trace {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Replay the trace into `sink` and hand back the sink with counters
fn run<S: HintSink>(
    input: Box<dyn BufRead>,
    config: &HintletConfig,
    sink: S,
) -> Result<(S, HintSummary, ReplayStats)> {
    let mut engine = HintletEngine::new(SummarySink::new(sink));
    register_builtin_rules(&mut engine, config);

    let stats = replay(input, &mut engine).context("Failed to read trace")?;
    engine.flush().context("Failed to write hints")?;

    let (sink, summary) = engine.into_sink().into_parts();
    Ok((sink, summary, stats))
}

fn print_rules(config: &HintletConfig) {
    for id in BUILTIN_RULE_IDS {
        if let Some(rule) = builtin_rule(id, config) {
            println!("{:<18} {}", id, rule.name());
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;

    if args.list_rules {
        print_rules(&config);
        return Ok(());
    }

    let input = open_input(&args)?;

    let (summary, stats) = match args.format {
        OutputFormat::Text => {
            let (_, summary, stats) = run(input, &config, TextSink::new(io::stdout().lock()))?;
            (summary, stats)
        }
        OutputFormat::Json => {
            let (mut output, summary, stats) = run(input, &config, JsonOutput::new())?;
            output.set_stats(&stats);
            println!("{}", output.to_json()?);
            (summary, stats)
        }
        OutputFormat::Csv => {
            let (output, summary, stats) = run(input, &config, CsvOutput::new())?;
            print!("{}", output.to_csv());
            io::stdout().flush()?;
            (summary, stats)
        }
    };

    if args.summary {
        eprint!("{}", summary);
        eprintln!(
            "{} records replayed, {} skipped, {} rule failures",
            stats.records, stats.skipped, stats.rule_failures
        );
    }

    Ok(())
}
