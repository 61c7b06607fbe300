use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fixture_suitegen::error::log_suite_error;
use fixture_suitegen::{
    check_all, render_all, write_all, CorpusScanner, GeneratorConfig, MatchRule, RuleOptions,
};
use serde::Serialize;
use tracing::Level;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.execute() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("suitegen error: {err:?}");
            ExitCode::from(1)
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "suitegen",
    about = "Generate fixture test suites and keep them in sync with their corpus"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn execute(self) -> Result<ExitCode> {
        match self.command {
            Command::Generate(args) => generate_command(args),
            Command::Check(args) => check_command(args),
            Command::Scan(args) => scan_command(args),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render configured suites and write the ones that changed.
    Generate(GenerateArgs),
    /// Fail with exit code 2 when committed suites are out of date.
    Check(CheckArgs),
    /// List the fixtures a rule selects under a corpus root.
    Scan(ScanArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Generator configuration file.
    #[arg(long)]
    config: PathBuf,
    /// Only render the named suite.
    #[arg(long)]
    suite: Option<String>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Generator configuration file.
    #[arg(long)]
    config: PathBuf,
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Corpus root to walk.
    #[arg(long)]
    root: PathBuf,
    /// Fixture regex; capture group 1 becomes the test name.
    #[arg(long)]
    pattern: String,
    /// Excluded file name or root-relative path (repeatable).
    #[arg(long = "exclude")]
    excluded: Vec<String>,
    /// Match the pattern against the relative path.
    #[arg(long)]
    full_path: bool,
    /// Only look at the root's direct children.
    #[arg(long)]
    no_recursive: bool,
    /// Compare pattern and exclusions ignoring ASCII case.
    #[arg(long)]
    ignore_case: bool,
    /// Treat matching directories as fixtures.
    #[arg(long)]
    directories: bool,
    /// Print one JSON object per fixture.
    #[arg(long)]
    json: bool,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: &Path) -> Result<GeneratorConfig> {
    GeneratorConfig::load_from_file(path)
        .map_err(|err| {
            log_suite_error(&err, "load_config");
            err
        })
        .with_context(|| format!("loading {}", path.display()))
}

fn generate_command(args: GenerateArgs) -> Result<ExitCode> {
    let config = load_config(&args.config)?;
    let rendered = render_all(&config, args.suite.as_deref()).map_err(|err| {
        log_suite_error(&err, "generate");
        err
    })?;
    let summary = write_all(&rendered)?;
    for path in &summary.written {
        println!("wrote {}", path.display());
    }
    for path in &summary.unchanged {
        println!("unchanged {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn check_command(args: CheckArgs) -> Result<ExitCode> {
    let config = load_config(&args.config)?;
    let rendered = render_all(&config, None).map_err(|err| {
        log_suite_error(&err, "check");
        err
    })?;
    let stale = check_all(&rendered);
    if stale.is_empty() {
        println!("{} suites up to date", rendered.len());
        return Ok(ExitCode::SUCCESS);
    }
    for err in &stale {
        eprintln!("{err}");
    }
    Ok(ExitCode::from(2))
}

#[derive(Serialize)]
struct ScanLine<'a> {
    path: &'a str,
    test_name: &'a str,
    group: String,
}

fn scan_command(args: ScanArgs) -> Result<ExitCode> {
    let options = RuleOptions {
        case_sensitive: !args.ignore_case,
        full_path: args.full_path,
        recursive: !args.no_recursive,
        match_directories: args.directories,
    };
    let rule = MatchRule::new(&args.pattern, options)?.with_excluded(&args.excluded);
    let entries = CorpusScanner::new(&args.root, &rule).collect_sorted()?;
    for entry in &entries {
        let path = entry.locator_path();
        if args.json {
            let line = ScanLine {
                path: &path,
                test_name: entry.test_name.as_str(),
                group: entry.group_dir(),
            };
            println!("{}", serde_json::to_string(&line)?);
        } else {
            println!("{path}");
        }
    }
    tracing::info!("[Scanner] {} fixtures", entries.len());
    Ok(ExitCode::SUCCESS)
}
