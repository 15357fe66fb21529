//! Command-line interface for contactregister.
//!
//! Each subcommand lives in its own module with an `Args` struct and a `run`
//! function. Running without a subcommand starts the interactive menu.

use crate::config::Config;
use crate::contact::Contact;
use crate::register::{validate_list_name, ContactRegister};
use crate::store::ContactStore;
use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod add;
pub mod export;
pub mod import;
pub mod interactive;
pub mod list;
pub mod remove;
pub mod search;

/// contactregister - create, search and export contact lists
#[derive(Parser)]
#[command(name = "contactregister")]
#[command(about = "Create, search, import and export contact lists")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the contact lists
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Contact list to work on
    #[arg(short, long, global = true)]
    pub list: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Add a contact to the list
    Add(add::AddArgs),
    /// Search contacts, e.g. `name=ada,email=example.org`
    Search(search::SearchArgs),
    /// Show every contact in the list
    List(list::ListArgs),
    /// Remove a contact by id or id prefix
    Remove(remove::RemoveArgs),
    /// Export the list to a CSV, JSON or vCard file
    Export(export::ExportArgs),
    /// Import contacts from a CSV or JSON file
    Import(import::ImportArgs),
    /// Show the contact lists in the data directory
    Lists,
    /// Start the interactive menu (the default)
    Interactive,
}

/// How contact listings are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Resolved settings shared by every command
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub register: ContactRegister,
    pub list_name: String,
}

impl Context {
    /// Apply command-line overrides on top of `config` and open the data directory
    pub fn new(
        mut config: Config,
        data_dir: Option<PathBuf>,
        list: Option<String>,
    ) -> Result<Self> {
        if let Some(data_dir) = data_dir {
            config.storage.data_dir = data_dir;
        }

        let list_name = list.unwrap_or_else(|| config.storage.default_list.clone());
        validate_list_name(&list_name)?;

        let register = ContactRegister::open(&config.storage.data_dir).with_context(|| {
            format!(
                "failed to open data directory {}",
                config.storage.data_dir.display()
            )
        })?;

        Ok(Self {
            config,
            register,
            list_name,
        })
    }

    /// Load the current list
    pub fn open_store(&self) -> Result<ContactStore> {
        let store = self
            .register
            .open_list(&self.list_name)
            .with_context(|| format!("failed to open list '{}'", self.list_name))?;
        Ok(store)
    }
}

/// Load the config named on the command line, or the platform default
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Run the parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    crate::logging::init_logging(&config.logging, cli.verbose)?;

    let ctx = Context::new(config, cli.data_dir, cli.list)?;
    debug!(
        "Working on list '{}' in {}",
        ctx.list_name,
        ctx.register.data_dir().display()
    );

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Add(args) => add::run(args, &ctx),
        Commands::Search(args) => search::run(args, &ctx),
        Commands::List(args) => list::run(args, &ctx),
        Commands::Remove(args) => remove::run(args, &ctx),
        Commands::Export(args) => export::run(args, &ctx),
        Commands::Import(args) => import::run(args, &ctx),
        Commands::Lists => list::run_lists(&ctx),
        Commands::Interactive => interactive::run(&ctx),
    }
}

/// Print contacts in the requested format
pub fn print_contacts(contacts: &[&Contact], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(contacts)?),
        OutputFormat::Table => print!("{}", render_table(contacts)),
    }
    Ok(())
}

/// Fixed-width table of contacts
pub fn render_table(contacts: &[&Contact]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{:<10} {:<24} {:<18} {:<28} {}\n",
        "ID", "Name", "Phone", "Email", "Address"
    ));
    out.push_str(&format!("{}\n", "-".repeat(100)));

    for contact in contacts {
        out.push_str(
            format!(
                "{:<10} {:<24} {:<18} {:<28} {}",
                contact.short_id(),
                truncate(&contact.name, 24),
                truncate(contact.phone.as_deref().unwrap_or("-"), 18),
                truncate(contact.email.as_deref().unwrap_or("-"), 28),
                contact.address.as_deref().unwrap_or("-"),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut truncated: String = value.chars().take(width.saturating_sub(1)).collect();
        truncated.push('…');
        truncated
    }
}
