use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use focus_core::{Clock, FixedClock, FocusService, ReadinessPolicy, Scope, SystemClock};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

mod config;
mod logging;
mod render;
mod snapshot;

use crate::config::Config;
use crate::snapshot::FileSource;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FOCUS_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "focus", version = VERSION, about = "Rank what you can start right now")]
struct Cli {
    /// Config file (default: ~/.focus/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Global log level; overrides FOCUS_LOG (default: warn)
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank tasks assigned to one person ("my tasks")
    Mine {
        #[command(flatten)]
        run: RunArgs,

        /// Only tasks assigned to this user id; others stay as dependency context
        #[arg(long)]
        user: Option<String>,
    },

    /// Rank tasks across members of a workspace
    Team {
        #[command(flatten)]
        run: RunArgs,

        /// Workspace id to rank (default: everything in the snapshot)
        #[arg(long)]
        workspace: Option<String>,

        /// Only this member's tasks
        #[arg(long)]
        member: Option<String>,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON snapshot: { "tasks": [...], "related": [...], "edges": [...] }
    #[arg(long, value_name = "FILE")]
    snapshot: PathBuf,

    /// Extra edges as CSV with header `predecessor,successor`
    #[arg(long, value_name = "FILE")]
    edges: Option<PathBuf>,

    /// Max entries per list (overrides [display].limit; 0 = all)
    #[arg(long)]
    limit: Option<usize>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Evaluate as of this local time ("YYYY-MM-DD HH:MM" in [display].timezone)
    #[arg(long, value_name = "TIME")]
    now: Option<String>,

    /// Ignore predecessor completion for this run
    #[arg(long)]
    no_enforce: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() {
    if let Err(err) = run_main() {
        eprintln!("focus error: {err:#}");
        std::process::exit(1);
    }
}

fn run_main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.map(LevelFilter::from))?;

    let config_path = config::resolve_path(cli.config.as_deref())?;

    match cli.command {
        Command::Mine { run, user } => {
            let cfg = config::load_config(&config_path)?;
            let scope = Scope::user(user.clone().unwrap_or_else(|| "me".to_string()));
            let source = FileSource {
                snapshot: run.snapshot.clone(),
                edges: run.edges.clone(),
                user,
                workspace: None,
            };
            rank(&cfg, &run, source, &scope)?;
        }

        Command::Team {
            run,
            workspace,
            member,
        } => {
            let cfg = config::load_config(&config_path)?;
            let scope = Scope::team(workspace.clone().unwrap_or_default(), member);
            let source = FileSource {
                snapshot: run.snapshot.clone(),
                edges: run.edges.clone(),
                user: None,
                workspace,
            };
            rank(&cfg, &run, source, &scope)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(&config_path)?,
            ConfigCommand::Show => {
                let cfg = config::load_config(&config_path)?;
                println!("# {}", config_path.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn rank(cfg: &Config, run: &RunArgs, source: FileSource, scope: &Scope) -> Result<()> {
    let engine = cfg.engine()?;
    let tz = engine.timezone();

    let policy = if run.no_enforce {
        ReadinessPolicy::relaxed()
    } else {
        cfg.policy()
    };

    let clock: Box<dyn Clock> = match &run.now {
        Some(local) => Box::new(FixedClock(
            focus_core::time::parse_local_to_utc(local, tz).context("--now")?,
        )),
        None => Box::new(SystemClock),
    };

    let service = FocusService::new(engine, source, policy, clock);
    let result = service
        .focus(scope)
        .with_context(|| format!("rank {}", run.snapshot.display()))?;

    let limit = run.limit.unwrap_or(cfg.display.limit);
    let result = render::truncate(result, limit);

    if run.json {
        render::print_json(&result)?;
    } else {
        render::print_text(&result, tz, cfg.display.show_score_detail);
    }
    Ok(())
}
