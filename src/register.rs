//! A data directory holding named contact lists, one JSON file per list.

use crate::store::ContactStore;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension used for list files inside the data directory
pub const LIST_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct ContactRegister {
    data_dir: PathBuf,
}

impl ContactRegister {
    /// Open the register, creating the data directory if needed
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;
        debug!("Using data directory {}", data_dir.display());

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing list `name`
    pub fn list_path(&self, name: &str) -> Result<PathBuf> {
        validate_list_name(name)?;
        Ok(self
            .data_dir
            .join(format!("{}.{}", name, LIST_EXTENSION)))
    }

    /// Open a named list; lists that were never saved open empty
    pub fn open_list(&self, name: &str) -> Result<ContactStore> {
        let path = self.list_path(name)?;
        let mut store = ContactStore::open(&path)?;
        if store.name() != name {
            debug!(
                "List file {} is named '{}', using '{}'",
                path.display(),
                store.name(),
                name
            );
            store = store.renamed(name);
        }
        Ok(store)
    }

    /// Names of the saved lists, sorted
    pub fn list_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.data_dir)? {
            let path = entry?.path();

            if path.extension().map_or(false, |ext| ext == LIST_EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if validate_list_name(stem).is_ok() {
                        names.push(stem.to_string());
                    }
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

/// List names may use ASCII letters, digits, `-` and `_`
pub fn validate_list_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidListName {
            name: name.to_string(),
        })
    }
}
