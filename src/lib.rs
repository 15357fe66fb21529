//! # contactregister
//!
//! Create, search, import and export contact lists from the command line.
//!
//! ## Features
//!
//! - **Contact store**: ordered contact lists persisted as JSON with atomic writes
//! - **Search**: `field=pattern` filters with case-insensitive substring matching
//! - **Export**: CSV, JSON and vCard 3.0
//! - **Import**: CSV and JSON, skipping contacts that are already present
//! - **Named lists**: any number of lists side by side in one data directory
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use contactregister::{Contact, ContactRegister, ExportFormat, Query};
//! use std::path::Path;
//!
//! # fn main() -> contactregister::Result<()> {
//! let register = ContactRegister::open("./contacts")?;
//! let mut friends = register.open_list("friends")?;
//!
//! friends.add(Contact::new("Ada Lovelace").with_email("ada@example.org"))?;
//! friends.save()?;
//!
//! let query = Query::parse("email=example.org")?;
//! for contact in friends.search(&query) {
//!     println!("{}", contact);
//! }
//!
//! friends.export(Path::new("friends.csv"), ExportFormat::Csv)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod contact;
pub mod error;
pub mod exporters;
pub mod importers;
pub mod logging;
pub mod query;
pub mod register;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use contact::{Contact, ContactField, ContactId};
pub use error::{Error, Result};
pub use exporters::{ContactExporter, CsvExporter, ExportFormat, JsonExporter, VcfExporter};
pub use importers::{ContactImporter, CsvImporter, ImportFormat, JsonImporter};
pub use query::{Query, QueryFilter};
pub use register::ContactRegister;
pub use store::{ContactStore, ImportSummary};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
