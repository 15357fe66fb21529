//! In-memory contact list backed by a JSON list file.

use crate::contact::{Contact, ContactId};
use crate::exporters::{exporter_for, ExportFormat};
use crate::query::Query;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use uuid::Uuid;

/// List file format version
pub const STORE_VERSION: u32 = 1;

/// Shortest id prefix accepted by [`ContactStore::resolve`]
pub const MIN_ID_PREFIX: usize = 4;

#[derive(Deserialize)]
struct StoreHeader {
    version: u32,
}

#[derive(Deserialize)]
struct StoreFile {
    name: String,
    contacts: Vec<Contact>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    version: u32,
    name: &'a str,
    contacts: &'a [Contact],
}

/// Outcome of [`ContactStore::import`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    /// Records whose id was already present
    pub skipped: usize,
}

/// An ordered contact list
#[derive(Debug, Clone)]
pub struct ContactStore {
    name: String,
    path: Option<PathBuf>,
    contacts: Vec<Contact>,
    dirty: bool,
}

impl ContactStore {
    /// Create an empty list that is not backed by a file
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            contacts: Vec::new(),
            dirty: false,
        }
    }

    /// Load a list file; a missing file opens as an empty list
    pub fn open(path: &Path) -> Result<Self> {
        let default_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("contacts")
            .to_string();

        if !path.exists() {
            debug!("List file {} not found, starting empty", path.display());
            let mut store = Self::new(default_name);
            store.path = Some(path.to_path_buf());
            return Ok(store);
        }

        let content = fs::read_to_string(path)?;
        let header: StoreHeader = serde_json::from_str(&content)?;
        if header.version != STORE_VERSION {
            return Err(Error::UnsupportedVersion {
                version: header.version,
            });
        }

        let file: StoreFile = serde_json::from_str(&content)?;
        let mut seen = HashSet::new();
        for contact in &file.contacts {
            contact.validate()?;
            if !seen.insert(contact.id) {
                return Err(Error::DuplicateContact {
                    id: contact.id.to_string(),
                });
            }
        }

        debug!(
            "Loaded {} contacts from {}",
            file.contacts.len(),
            path.display()
        );

        Ok(Self {
            name: file.name,
            path: Some(path.to_path_buf()),
            contacts: file.contacts,
            dirty: false,
        })
    }

    /// Persist the list to its backing file
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or_else(|| Error::Configuration {
            reason: format!("list '{}' has no backing file", self.name),
        })?;
        self.save_as(&path)
    }

    /// Persist the list to `path` and make it the backing file
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        let file = StoreFileRef {
            version: STORE_VERSION,
            name: &self.name,
            contacts: &self.contacts,
        };
        let json = serde_json::to_string_pretty(&file)?;
        write_atomic(path, json.as_bytes())?;

        debug!("Saved {} contacts to {}", self.contacts.len(), path.display());
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether the list changed since it was loaded or saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// All contacts in insertion order
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Validate and append a contact
    pub fn add(&mut self, mut contact: Contact) -> Result<ContactId> {
        contact.normalize();
        contact.validate()?;

        if self.get(contact.id).is_some() {
            return Err(Error::DuplicateContact {
                id: contact.id.to_string(),
            });
        }

        let id = contact.id;
        info!("Added contact {} to list '{}'", contact.short_id(), self.name);
        self.contacts.push(contact);
        self.dirty = true;
        Ok(id)
    }

    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    /// Look a contact up by full id or by a unique id prefix
    pub fn resolve(&self, key: &str) -> Result<&Contact> {
        let key = key.trim().to_lowercase();
        let not_found = || Error::ContactNotFound { key: key.clone() };

        if let Ok(id) = Uuid::parse_str(&key) {
            return self.get(id).ok_or_else(not_found);
        }

        if key.len() < MIN_ID_PREFIX {
            return Err(not_found());
        }

        let mut matches = self.contacts.iter().filter(|c| {
            c.id.to_string().starts_with(&key) || c.id.simple().to_string().starts_with(&key)
        });

        match (matches.next(), matches.next()) {
            (Some(contact), None) => Ok(contact),
            (Some(_), Some(_)) => Err(Error::AmbiguousId { key: key.clone() }),
            (None, _) => Err(not_found()),
        }
    }

    /// Remove a contact, returning it
    pub fn remove(&mut self, id: ContactId) -> Result<Contact> {
        let index = self
            .contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| Error::ContactNotFound {
                key: id.to_string(),
            })?;

        let contact = self.contacts.remove(index);
        info!(
            "Removed contact {} from list '{}'",
            contact.short_id(),
            self.name
        );
        self.dirty = true;
        Ok(contact)
    }

    /// Contacts matching `query`, lazily, in list order
    pub fn search<'a>(&'a self, query: &'a Query) -> impl Iterator<Item = &'a Contact> + 'a {
        self.contacts.iter().filter(move |c| query.matches(c))
    }

    /// Append contacts whose id is not yet present.
    ///
    /// Every record is validated first; one invalid record rejects the batch.
    pub fn import(&mut self, contacts: Vec<Contact>) -> Result<ImportSummary> {
        let mut batch = Vec::with_capacity(contacts.len());
        for mut contact in contacts {
            contact.normalize();
            contact.validate()?;
            batch.push(contact);
        }

        let mut known: HashSet<ContactId> = self.contacts.iter().map(|c| c.id).collect();
        let mut summary = ImportSummary::default();

        for contact in batch {
            if known.insert(contact.id) {
                self.contacts.push(contact);
                summary.added += 1;
            } else {
                debug!("Skipping already present contact {}", contact.id);
                summary.skipped += 1;
            }
        }

        if summary.added > 0 {
            self.dirty = true;
        }

        info!(
            "Imported {} contacts into list '{}' ({} skipped)",
            summary.added, self.name, summary.skipped
        );
        Ok(summary)
    }

    /// Write the whole list to `destination`; the store itself is untouched
    pub fn export(&self, destination: &Path, format: ExportFormat) -> Result<()> {
        if let Some(path) = &self.path {
            if same_location(path, destination) {
                return Err(Error::ExportOverwritesList {
                    path: destination.to_path_buf(),
                });
            }
        }
        exporter_for(format).export_contacts(&self.contacts, destination)
    }
}

/// Resolve `path` to an absolute location, even when the file itself does not exist yet
fn canonical_location(path: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = fs::canonicalize(path) {
        return Some(resolved);
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name()?;
    fs::canonicalize(dir).ok().map(|dir| dir.join(file_name))
}

fn same_location(a: &Path, b: &Path) -> bool {
    match (canonical_location(a), canonical_location(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

/// Write `contents` to a temporary file next to `path`, then rename it into place.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
