//! List and lists command implementations.

use super::{print_contacts, Context, OutputFormat};
use crate::contact::Contact;
use anyhow::Result;
use clap::Args;

/// Arguments for the list command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Run the list command
pub fn run(args: ListArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;

    if store.is_empty() && args.format == OutputFormat::Table {
        println!("List '{}' has no contacts.", store.name());
        return Ok(());
    }

    let contacts: Vec<&Contact> = store.contacts().iter().collect();
    print_contacts(&contacts, args.format)
}

/// Run the lists command
pub fn run_lists(ctx: &Context) -> Result<()> {
    let names = ctx.register.list_names()?;

    if names.is_empty() {
        println!(
            "No contact lists in {}",
            ctx.register.data_dir().display()
        );
        return Ok(());
    }

    println!("{:<2} {:<24} {:>8}", "", "List", "Contacts");
    println!("{}", "-".repeat(36));

    for name in names {
        let marker = if name == ctx.list_name { "*" } else { "" };
        match ctx.register.open_list(&name) {
            Ok(store) => println!("{:<2} {:<24} {:>8}", marker, name, store.len()),
            Err(e) => println!("{:<2} {:<24} {:>8}  ({})", marker, name, "?", e),
        }
    }

    Ok(())
}
