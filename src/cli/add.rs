//! Add command implementation.

use super::Context;
use crate::contact::Contact;
use anyhow::Result;
use clap::Args;

/// Arguments for the add command
#[derive(Args, Debug, Clone, Default)]
pub struct AddArgs {
    /// Full name of the contact
    #[arg(short, long)]
    pub name: String,

    /// Phone number
    #[arg(short, long)]
    pub phone: Option<String>,

    /// Email address
    #[arg(short, long)]
    pub email: Option<String>,

    /// Postal address
    #[arg(long)]
    pub address: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

impl AddArgs {
    pub fn into_contact(self) -> Contact {
        let mut contact = Contact::new(self.name);
        contact.phone = self.phone;
        contact.email = self.email;
        contact.address = self.address;
        contact.notes = self.notes;
        contact.normalize();
        contact
    }
}

/// Run the add command
pub fn run(args: AddArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let contact = args.into_contact();
    let summary = contact.to_string();
    let short_id = contact.short_id();

    store.add(contact)?;
    store.save()?;

    println!(
        "Added {} to list '{}' (id {})",
        summary,
        store.name(),
        short_id
    );
    Ok(())
}
