use booksummary::api::SummaryApi;
use booksummary::config::AppConfig;
use booksummary::error::{Result, SummaryError};
use booksummary::model::{Record, Tier};
use booksummary::paths::StorageRoots;
use booksummary::store::tree::SharedRoot;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

mod args;
use args::{Cli, Commands};

const HOME_ENV: &str = "BOOKSUMMARY_HOME";
const PREVIEW_WIDTH: usize = 50;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: SummaryApi,
    config: AppConfig,
    config_dir: PathBuf,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::List) | None => handle_list(&ctx),
        Some(Commands::Save { tier, name, body }) => handle_save(&ctx, tier, name, body),
        Some(Commands::Update { tier, name, body }) => handle_update(&ctx, tier, name, body),
        Some(Commands::Delete { tier, name }) => handle_delete(&ctx, tier, name),
        Some(Commands::Watch) => handle_watch(&ctx),
        Some(Commands::Grant { dir }) => handle_grant(&mut ctx, Some(dir)),
        Some(Commands::Revoke) => handle_grant(&mut ctx, None),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .format_timestamp(None)
    .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let (roots, config_dir) = match std::env::var_os(HOME_ENV) {
        Some(home) => {
            let home = PathBuf::from(home);
            (StorageRoots::under(&home), home)
        }
        None => {
            let proj_dirs = ProjectDirs::from("com", "booksummary", "booksummary").ok_or_else(
                || SummaryError::Config("Could not determine config dir".to_string()),
            )?;
            (
                StorageRoots::from_system()?,
                proj_dirs.config_dir().to_path_buf(),
            )
        }
    };

    let mut config = AppConfig::load(&config_dir)?;
    if let Some(level) = cli.api_level {
        config.api_level = level;
    }

    let mut api = SummaryApi::with_filesystem(config.platform(), roots);
    api.set_shared_root(config.shared_root.as_deref().map(SharedRoot::new));

    Ok(AppContext {
        api,
        config,
        config_dir,
    })
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    print_records(&ctx.api.list());
    Ok(())
}

fn handle_save(ctx: &AppContext, tier: Tier, name: String, body: Vec<String>) -> Result<()> {
    let name = require_name(name)?;
    let record = Record::new(tier, name, body.join(" "));
    let listing = ctx.api.save(&record);
    report_presence(&listing, tier, &record.file_name(), "Saved");
    print_records(&listing);
    Ok(())
}

fn handle_update(ctx: &AppContext, tier: Tier, name: String, body: Vec<String>) -> Result<()> {
    let name = require_name(name)?;
    let record = Record::new(tier, name, body.join(" "));
    let listing = ctx.api.update(&record);
    report_presence(&listing, tier, &record.name, "Updated");
    print_records(&listing);
    Ok(())
}

fn handle_delete(ctx: &AppContext, tier: Tier, name: String) -> Result<()> {
    let name = require_name(name)?;
    let record = Record::new(tier, name, String::new());
    let listing = ctx.api.delete(&record);
    print_records(&listing);
    Ok(())
}

fn handle_watch(ctx: &AppContext) -> Result<()> {
    let subscription = ctx.api.subscribe();
    if let Some(listing) = subscription.next_timeout(Duration::from_secs(1)) {
        print_records(&listing);
    }
    subscription.cancel();
    Ok(())
}

fn handle_grant(ctx: &mut AppContext, dir: Option<String>) -> Result<()> {
    let handle = match dir {
        Some(dir) => {
            let path = Path::new(&dir);
            if !path.is_dir() {
                return Err(SummaryError::Config(format!("{} is not a directory", dir)));
            }
            let absolute = path.canonicalize().map_err(SummaryError::Io)?;
            Some(SharedRoot::from_path(absolute))
        }
        None => None,
    };

    ctx.config
        .set_shared_root(handle.as_ref().map(SharedRoot::as_str));
    ctx.config.save(&ctx.config_dir)?;

    match &handle {
        Some(root) => println!("{}", format!("Shared directory granted: {}", root).green()),
        None => println!("{}", "Shared directory grant removed".yellow()),
    }
    ctx.api.set_shared_root(handle);
    Ok(())
}

fn require_name(name: String) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SummaryError::Config("Name cannot be empty".into()));
    }
    Ok(trimmed.to_string())
}

/// Flags a mutation whose record is absent from the returned listing.
fn report_presence(listing: &[Record], tier: Tier, name: &str, verb: &str) {
    let present = listing.iter().any(|r| r.tier == tier && r.name == name);
    if present {
        println!("{}", format!("{} {} ({})", verb, name, tier).green());
    } else {
        println!(
            "{}",
            format!("{} {} ({}) is not visible in the listing", verb, name, tier).yellow()
        );
    }
}

fn print_records(records: &[Record]) {
    if records.is_empty() {
        println!("No summaries yet.");
        return;
    }

    let name_width = records
        .iter()
        .map(|r| r.name.width())
        .max()
        .unwrap_or(0);

    for record in records {
        let label = format!("{:<16}", record.tier.to_string());
        let label = match record.tier {
            Tier::Internal => label.blue(),
            Tier::PrivateExternal => label.magenta(),
            Tier::Shared => label.cyan(),
        };
        let padding = " ".repeat(name_width.saturating_sub(record.name.width()));
        println!(
            "{} {}{}  {}",
            label,
            record.name.bold(),
            padding,
            preview(&record.body, PREVIEW_WIDTH).dimmed()
        );
    }
}

/// First line of `body`, cut to `max` display columns.
fn preview(body: &str, max: usize) -> String {
    let line = body.lines().next().unwrap_or("");
    if line.width() <= max {
        return line.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in line.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > max.saturating_sub(1) {
            break;
        }
        width += w;
        out.push(ch);
    }
    out.push('…');
    out
}
