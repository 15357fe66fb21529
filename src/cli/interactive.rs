//! Interactive menu mode.
//!
//! Every action prompts for its inputs and reports failures without leaving
//! the loop. Mutations are saved as soon as they succeed.

use super::{render_table, Context};
use crate::contact::Contact;
use crate::importers::{importer_for, ImportFormat};
use crate::query::Query;
use crate::register::validate_list_name;
use crate::store::ContactStore;
use anyhow::{bail, Result};
use dialoguer::{Confirm, Input, Select};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Entries of the main menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Add,
    Search,
    List,
    Remove,
    Export,
    Import,
    SwitchList,
    Quit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 8] = [
        MenuAction::Add,
        MenuAction::Search,
        MenuAction::List,
        MenuAction::Remove,
        MenuAction::Export,
        MenuAction::Import,
        MenuAction::SwitchList,
        MenuAction::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Add => "Add a contact",
            MenuAction::Search => "Search contacts",
            MenuAction::List => "List all contacts",
            MenuAction::Remove => "Remove a contact",
            MenuAction::Export => "Export list to file",
            MenuAction::Import => "Import contacts from file",
            MenuAction::SwitchList => "Switch contact list",
            MenuAction::Quit => "Quit",
        }
    }

    /// Whether the action can change the current list
    pub fn mutates(self) -> bool {
        matches!(
            self,
            MenuAction::Add | MenuAction::Remove | MenuAction::Import
        )
    }
}

/// Run the interactive menu until the user quits
pub fn run(ctx: &Context) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        bail!(
            "Interactive mode requires a terminal.\n\
             Use a subcommand such as `add`, `search` or `export` instead."
        );
    }

    let mut session = Session {
        ctx,
        store: ctx.open_store()?,
    };
    session.run()
}

struct Session<'a> {
    ctx: &'a Context,
    store: ContactStore,
}

impl Session<'_> {
    fn run(&mut self) -> Result<()> {
        let labels: Vec<&str> = MenuAction::ALL.iter().map(|a| a.label()).collect();

        loop {
            println!();
            let selection = Select::new()
                .with_prompt(format!(
                    "contactregister [{}: {} contacts]",
                    self.store.name(),
                    self.store.len()
                ))
                .items(&labels)
                .default(0)
                .interact()?;
            let action = MenuAction::ALL[selection];
            debug!("Menu action selected: {:?}", action);

            if action == MenuAction::Quit {
                break;
            }

            if let Err(e) = self.dispatch(action) {
                println!("Error: {:#}", e);
            }

            if action.mutates() && self.store.is_dirty() {
                if let Err(e) = self.store.save() {
                    warn!("Saving list '{}' failed: {}", self.store.name(), e);
                    println!("Error: could not save list '{}': {}", self.store.name(), e);
                }
            }
        }

        if self.store.is_dirty() {
            self.store.save()?;
        }
        Ok(())
    }

    fn dispatch(&mut self, action: MenuAction) -> Result<()> {
        match action {
            MenuAction::Add => self.add(),
            MenuAction::Search => self.search(),
            MenuAction::List => {
                self.print(self.store.contacts().iter().collect());
                Ok(())
            }
            MenuAction::Remove => self.remove(),
            MenuAction::Export => self.export(),
            MenuAction::Import => self.import(),
            MenuAction::SwitchList => self.switch_list(),
            MenuAction::Quit => Ok(()),
        }
    }

    fn add(&mut self) -> Result<()> {
        let name: String = Input::new().with_prompt("Name").interact_text()?;
        let mut contact = Contact::new(name);
        contact.phone = Some(prompt_optional("Phone")?);
        contact.email = Some(prompt_optional("Email")?);
        contact.address = Some(prompt_optional("Address")?);
        contact.notes = Some(prompt_optional("Notes")?);

        let summary = contact.to_string();
        self.store.add(contact)?;
        println!("Added {}", summary);
        Ok(())
    }

    fn search(&mut self) -> Result<()> {
        let raw: String = Input::new()
            .with_prompt("Query (e.g. name=ada,email=example.org)")
            .interact_text()?;
        let query = Query::parse(&raw)?;
        self.print(self.store.search(&query).collect());
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        if self.store.is_empty() {
            println!("List '{}' has no contacts.", self.store.name());
            return Ok(());
        }

        let labels: Vec<String> = self
            .store
            .contacts()
            .iter()
            .map(|c| format!("{}  {}", c.short_id(), c))
            .collect();
        let selection = Select::new()
            .with_prompt("Contact to remove")
            .items(&labels)
            .interact()?;
        let chosen = &self.store.contacts()[selection];
        let (id, summary) = (chosen.id, chosen.to_string());

        let confirmed = Confirm::new()
            .with_prompt(format!("Remove {}?", summary))
            .default(false)
            .interact()?;
        if confirmed {
            let removed = self.store.remove(id)?;
            println!("Removed {}", removed);
        }
        Ok(())
    }

    fn export(&mut self) -> Result<()> {
        let default_path = format!(
            "{}.{}",
            self.store.name(),
            self.ctx.config.export.default_format.extension()
        );
        let output: String = Input::new()
            .with_prompt("Export to")
            .default(default_path)
            .interact_text()?;
        let output = PathBuf::from(output);

        let format = super::export::resolve_format(
            None,
            &output,
            self.ctx.config.export.default_format,
        );
        self.store.export(&output, format)?;
        println!(
            "Exported {} contacts to {} ({})",
            self.store.len(),
            output.display(),
            format
        );
        Ok(())
    }

    fn import(&mut self) -> Result<()> {
        let input: String = Input::new().with_prompt("Import from").interact_text()?;
        let input = PathBuf::from(input);

        let format = match ImportFormat::from_path(&input) {
            Some(format) => format,
            None => {
                let choices = [ImportFormat::Csv, ImportFormat::Json];
                let selection = Select::new()
                    .with_prompt("File format")
                    .items(&choices.map(|f| f.to_string()))
                    .default(0)
                    .interact()?;
                choices[selection]
            }
        };

        let contacts = importer_for(format).import_contacts(&input)?;
        let summary = self.store.import(contacts)?;
        println!(
            "Imported {} contacts ({} already present)",
            summary.added, summary.skipped
        );
        Ok(())
    }

    fn switch_list(&mut self) -> Result<()> {
        let known = self.ctx.register.list_names()?;
        if !known.is_empty() {
            println!("Existing lists: {}", known.join(", "));
        }

        let name: String = Input::new()
            .with_prompt("List name")
            .validate_with(|input: &String| {
                validate_list_name(input.trim()).map_err(|e| e.to_string())
            })
            .interact_text()?;

        if self.store.is_dirty() {
            self.store.save()?;
        }
        self.store = self.ctx.register.open_list(name.trim())?;
        println!(
            "Now using list '{}' ({} contacts)",
            self.store.name(),
            self.store.len()
        );
        Ok(())
    }

    fn print(&self, contacts: Vec<&Contact>) {
        if contacts.is_empty() {
            println!("No contacts found.");
        } else {
            print!("{}", render_table(&contacts));
        }
    }
}

/// Prompt for a value that may be left blank
fn prompt_optional(prompt: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(format!("{} (optional)", prompt))
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_order_ends_with_quit() {
        assert_eq!(MenuAction::ALL.first(), Some(&MenuAction::Add));
        assert_eq!(MenuAction::ALL.last(), Some(&MenuAction::Quit));
    }

    #[test]
    fn test_menu_labels_are_unique() {
        let mut labels: Vec<&str> = MenuAction::ALL.iter().map(|a| a.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), MenuAction::ALL.len());
    }

    #[test]
    fn test_only_edits_mutate() {
        let mutating: Vec<MenuAction> = MenuAction::ALL
            .into_iter()
            .filter(|a| a.mutates())
            .collect();
        assert_eq!(
            mutating,
            vec![MenuAction::Add, MenuAction::Remove, MenuAction::Import]
        );
    }
}
