use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::assignees;
use crate::config::{self, DEFAULT_CONFIG_PATH};
use crate::plan::{Executor, Migrator};
use crate::providers::github::GitHubClient;

#[derive(Debug, PartialEq)]
pub enum Command {
    Migrate(MigrateArgs),
    DumpAssignees(PathBuf),
    Help,
}

#[derive(Debug, PartialEq)]
pub struct MigrateArgs {
    pub config: PathBuf,
    pub dry_run: bool,
    pub verbose: bool,
}

impl Default for MigrateArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            dry_run: false,
            verbose: false,
        }
    }
}

impl Command {
    pub fn verbose(&self) -> bool {
        matches!(self, Command::Migrate(args) if args.verbose)
    }
}

/// Parse arguments (without the program name).
///
/// Supported forms:
///   migrate-repo [--config <path>] [--dry-run] [--verbose]
///   migrate-repo dump-assignees <file.tsv>
///   migrate-repo help
pub fn parse_args(args: &[String]) -> Result<Command> {
    match args.first().map(String::as_str) {
        Some("help" | "-h" | "--help") => return Ok(Command::Help),
        Some("dump-assignees") => {
            return match args.get(1) {
                Some(path) if args.len() == 2 => Ok(Command::DumpAssignees(PathBuf::from(path))),
                _ => bail!("Usage: migrate-repo dump-assignees <file.tsv>"),
            };
        }
        _ => {}
    }

    let mut parsed = MigrateArgs::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                match args.get(i) {
                    Some(path) => parsed.config = PathBuf::from(path),
                    None => bail!("Missing value for --config flag"),
                }
            }
            "-n" | "--dry-run" => parsed.dry_run = true,
            "-v" | "--verbose" => parsed.verbose = true,
            other => bail!("Unknown argument: {other}\n\nRun `migrate-repo help` for usage."),
        }
        i += 1;
    }
    Ok(Command::Migrate(parsed))
}

pub async fn run(command: Command) -> Result<()> {
    match command {
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::DumpAssignees(path) => {
            print!("{}", assignees::dump_assignees(&path)?);
            Ok(())
        }
        Command::Migrate(args) => handle_migrate(&args).await,
    }
}

async fn handle_migrate(args: &MigrateArgs) -> Result<()> {
    let config = config::load_config(&args.config)?;
    let source_client = GitHubClient::new(&config.source)?;
    let target_client = GitHubClient::new(&config.target)?;
    let source_repo = config.source.repository();
    let target_repo = config.target.repository();

    let migrator = Migrator::new(
        &source_client,
        &target_client,
        &target_client,
        config.alias_resolver(),
        Executor::from_config(&config.rate_limit),
    );

    if args.dry_run {
        let plan = migrator.plan(&source_repo, &target_repo).await?;
        if plan.is_empty() {
            println!("{target_repo} is up to date with {source_repo}");
        }
        for (i, action) in plan.actions.iter().enumerate() {
            println!("{:>4}. {action}", i + 1);
        }
        for card in &plan.skipped_cards {
            println!(
                "skip: card id={} content_url={}",
                card.card_id,
                card.content_url.as_deref().unwrap_or("-")
            );
        }
        println!("{} actions planned from {source_repo} to {target_repo}", plan.actions.len());
        return Ok(());
    }

    let report = migrator.migrate(&source_repo, &target_repo).await?;
    println!("Migrated {source_repo} to {target_repo}: {} actions applied", report.executed);
    Ok(())
}

pub fn print_help() {
    println!("migrate-repo — copy milestones, labels, issues and projects between repositories\n");
    println!("USAGE:");
    println!("  migrate-repo [OPTIONS]                   Reconcile target with source and apply changes");
    println!("  migrate-repo dump-assignees <file.tsv>   Print skip_users/user_aliases config from a user table");
    println!("  migrate-repo help                        Show this help");
    println!();
    println!("OPTIONS:");
    println!("  -c, --config <path>  Config file (default: {DEFAULT_CONFIG_PATH})");
    println!("  -n, --dry-run        Print the planned actions without applying them");
    println!("  -v, --verbose        Debug logging (RUST_LOG overrides)");
}
