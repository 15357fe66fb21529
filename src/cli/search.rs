//! Search command implementation.

use super::{print_contacts, Context, OutputFormat};
use crate::contact::Contact;
use crate::query::Query;
use anyhow::Result;
use clap::Args;

/// Arguments for the search command
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Comma-separated filters such as `name=ada,email=example.org`; a bare
    /// term matches any field
    pub query: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Run the search command
pub fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let query = Query::parse(&args.query)?;
    let matches: Vec<&Contact> = store.search(&query).collect();

    if matches.is_empty() && args.format == OutputFormat::Table {
        println!("No contacts in '{}' match {}", store.name(), query);
        return Ok(());
    }

    print_contacts(&matches, args.format)
}
