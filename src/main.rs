//! branch-elect - pick the server branch matching a local git branch.

use anyhow::{anyhow, Context, Result};
use branch_elect::adapters::Git2Repo;
use branch_elect::{
    build_commits_cache, elect, CommitsCache, Election, ElectionConfig, ServerBranch, WalkMode,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "branch-elect")]
#[command(about = "Match a local branch to the closest branch known to the analysis server")]
#[command(version)]
struct Args {
    /// Path to git repository (default: current directory)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Config file (default: $BRANCH_ELECT_CONFIG, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Which parent links ancestry walks follow
    #[arg(long, global = true, value_enum)]
    walk: Option<WalkArg>,

    /// Maximum commits walked per branch
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    /// Log tier decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Elect the server branch for a local branch
    Elect {
        /// Local branch (default: the checked-out branch)
        local: Option<String>,

        /// Server branch as `name` or `name:main`; repeat for each branch
        #[arg(short, long = "server", value_parser = parse_server_branch, required = true)]
        servers: Vec<ServerBranch>,
    },
    /// Print the commit ancestry of every local branch
    Cache,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum WalkArg {
    FirstParent,
    Full,
}

impl From<WalkArg> for WalkMode {
    fn from(arg: WalkArg) -> Self {
        match arg {
            WalkArg::FirstParent => WalkMode::FirstParent,
            WalkArg::Full => WalkMode::Full,
        }
    }
}

#[derive(Serialize)]
struct ElectionReport<'a> {
    local: &'a str,
    #[serde(flatten)]
    election: &'a Election,
}

fn parse_server_branch(value: &str) -> Result<ServerBranch, String> {
    let (name, is_main) = match value.rsplit_once(':') {
        Some((name, "main")) => (name, true),
        Some((_, flag)) => return Err(format!("unknown flag '{}', expected 'main'", flag)),
        None => (value, false),
    };
    if name.trim().is_empty() {
        return Err("branch name must not be empty".to_string());
    }
    Ok(ServerBranch::new(name, is_main))
}

/// One `name<TAB>length<TAB>tip` line per branch, or the full mapping as JSON.
fn render_cache(cache: CommitsCache, json: bool) -> Result<String> {
    let chains: BTreeMap<_, _> = cache.into_map().into_iter().collect();
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&chains)?));
    }

    let mut out = String::new();
    for (branch, chain) in &chains {
        let tip = chain.first().map(|c| c.as_str()).unwrap_or("-");
        out.push_str(&format!("{}\t{}\t{}\n", branch, chain.len(), tip));
    }
    Ok(out)
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("branch_elect={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = ElectionConfig::load(args.config.as_deref())?;
    if let Some(walk) = args.walk {
        config.walk = walk.into();
    }
    if args.max_depth.is_some() {
        config.max_depth = args.max_depth;
    }

    // Open git repo
    let git = match &args.path {
        Some(path) => Git2Repo::discover(path),
        None => Git2Repo::discover_current_dir(),
    }
    .context("Failed to open git repository. Are you in a git directory?")?;

    match args.command {
        Command::Elect { local, servers } => {
            let local = match local {
                Some(local) => local,
                None => git
                    .current_branch()?
                    .ok_or_else(|| anyhow!("HEAD is detached; pass the local branch name"))?,
            };

            let election = elect(&local, &git, &servers, &config.elect_options())?;
            tracing::debug!("{} -> {}", local, election);

            if args.json {
                let report = ElectionReport {
                    local: &local,
                    election: &election,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if let Some(branch) = election.branch() {
                println!("{}", branch);
            }

            Ok(match election {
                Election::NoMatch => ExitCode::FAILURE,
                _ => ExitCode::SUCCESS,
            })
        }
        Command::Cache => {
            let cache = build_commits_cache(&git, &config.walk_options());
            if cache.is_empty() {
                tracing::warn!("No local branch history could be read");
            }
            print!("{}", render_cache(cache, args.json)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
