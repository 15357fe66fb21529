//! Remove command implementation.

use super::Context;
use anyhow::Result;
use clap::Args;

/// Arguments for the remove command
#[derive(Args, Debug, Clone)]
pub struct RemoveArgs {
    /// Contact id, or a unique prefix of at least four characters
    pub id: String,
}

/// Run the remove command
pub fn run(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let id = store.resolve(&args.id)?.id;

    let removed = store.remove(id)?;
    store.save()?;

    println!("Removed {} from list '{}'", removed, store.name());
    Ok(())
}
