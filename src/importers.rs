//! Contact import formats: CSV and JSON.

use crate::contact::Contact;
use crate::store::STORE_VERSION;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::iter::Peekable;
use std::path::Path;
use std::str::{Chars, FromStr};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ImportFormat {
    Csv,
    Json,
}

impl ImportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("csv"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ImportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(Error::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

pub trait ContactImporter {
    /// Parse contacts out of the importer's text format
    fn parse(&self, content: &str) -> Result<Vec<Contact>>;

    fn format(&self) -> ImportFormat;

    fn import_contacts(&self, input_path: &Path) -> Result<Vec<Contact>> {
        if !input_path.is_file() {
            return Err(Error::NonexistentFile {
                path: input_path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(input_path)?;
        let contacts = self.parse(&content)?;

        info!(
            "Read {} contacts in {} format from {}",
            contacts.len(),
            self.format(),
            input_path.display()
        );
        Ok(contacts)
    }
}

/// Importer for the given format
pub fn importer_for(format: ImportFormat) -> Box<dyn ContactImporter> {
    match format {
        ImportFormat::Csv => Box::new(CsvImporter),
        ImportFormat::Json => Box::new(JsonImporter),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvImporter;

impl ContactImporter for CsvImporter {
    fn parse(&self, content: &str) -> Result<Vec<Contact>> {
        let mut records = CsvReader::new(content).read_all()?.into_iter();

        let Some(header) = records.next() else {
            return Ok(Vec::new());
        };
        let columns = CsvColumns::from_header(&header)?;

        let mut contacts = Vec::new();
        for record in records {
            if record.is_blank() {
                debug!("Skipping blank CSV row on line {}", record.line);
                continue;
            }
            contacts.push(columns.to_contact(&record)?);
        }

        Ok(contacts)
    }

    fn format(&self) -> ImportFormat {
        ImportFormat::Csv
    }
}

#[derive(Debug)]
struct CsvRecord {
    /// Line the record starts on, 1-based
    line: usize,
    fields: Vec<String>,
}

impl CsvRecord {
    fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.trim().is_empty())
    }
}

/// RFC 4180 reader: quoted fields may hold commas, doubled quotes and newlines.
struct CsvReader<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> CsvReader<'a> {
    fn new(content: &'a str) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        Self {
            chars: content.chars().peekable(),
            line: 1,
        }
    }

    fn read_all(mut self) -> Result<Vec<CsvRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_record()? {
            records.push(record);
        }
        Ok(records)
    }

    fn read_record(&mut self) -> Result<Option<CsvRecord>> {
        if self.chars.peek().is_none() {
            return Ok(None);
        }

        let line = self.line;
        let mut fields = Vec::new();

        loop {
            let (field, terminator) = self.read_field()?;
            fields.push(field);
            match terminator {
                Terminator::Comma => continue,
                Terminator::Newline | Terminator::Eof => break,
            }
        }

        Ok(Some(CsvRecord { line, fields }))
    }

    fn read_field(&mut self) -> Result<(String, Terminator)> {
        let mut field = String::new();

        if self.chars.peek() == Some(&'"') {
            self.chars.next();
            let start_line = self.line;
            loop {
                match self.chars.next() {
                    Some('"') if self.chars.peek() == Some(&'"') => {
                        self.chars.next();
                        field.push('"');
                    }
                    Some('"') => break,
                    Some(c) => {
                        if c == '\n' {
                            self.line += 1;
                        }
                        field.push(c);
                    }
                    None => {
                        return Err(Error::Parse {
                            line: start_line,
                            reason: "unterminated quoted field".to_string(),
                        })
                    }
                }
            }

            return match self.next_terminator() {
                Some(terminator) => Ok((field, terminator)),
                None => Err(Error::Parse {
                    line: self.line,
                    reason: "unexpected character after closing quote".to_string(),
                }),
            };
        }

        loop {
            match self.chars.peek() {
                Some(',') | Some('\n') | Some('\r') | None => break,
                Some('"') => {
                    return Err(Error::Parse {
                        line: self.line,
                        reason: "quote inside unquoted field".to_string(),
                    })
                }
                Some(&c) => {
                    field.push(c);
                    self.chars.next();
                }
            }
        }

        let terminator = self.next_terminator().unwrap_or(Terminator::Eof);
        Ok((field, terminator))
    }

    /// Consume a field terminator; `None` if the next character is not one
    fn next_terminator(&mut self) -> Option<Terminator> {
        match self.chars.peek() {
            None => Some(Terminator::Eof),
            Some(',') => {
                self.chars.next();
                Some(Terminator::Comma)
            }
            Some('\n') => {
                self.chars.next();
                self.line += 1;
                Some(Terminator::Newline)
            }
            Some('\r') => {
                self.chars.next();
                if self.chars.peek() == Some(&'\n') {
                    self.chars.next();
                }
                self.line += 1;
                Some(Terminator::Newline)
            }
            Some(_) => None,
        }
    }
}

enum Terminator {
    Comma,
    Newline,
    Eof,
}

/// Positions of the known columns in a CSV header
struct CsvColumns {
    width: usize,
    index: HashMap<String, usize>,
}

impl CsvColumns {
    fn from_header(header: &CsvRecord) -> Result<Self> {
        let mut index = HashMap::new();
        for (position, name) in header.fields.iter().enumerate() {
            index
                .entry(name.trim().to_ascii_lowercase())
                .or_insert(position);
        }

        if !index.contains_key("name") {
            return Err(Error::Parse {
                line: header.line,
                reason: "header has no 'name' column".to_string(),
            });
        }

        Ok(Self {
            width: header.fields.len(),
            index,
        })
    }

    fn get<'r>(&self, record: &'r CsvRecord, column: &str) -> &'r str {
        self.index
            .get(column)
            .and_then(|&i| record.fields.get(i))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    fn to_contact(&self, record: &CsvRecord) -> Result<Contact> {
        let line = record.line;
        let parse_error = |reason: String| Error::Parse { line, reason };

        if record.fields.len() > self.width {
            return Err(parse_error(format!(
                "expected at most {} fields, found {}",
                self.width,
                record.fields.len()
            )));
        }

        let id = match self.get(record, "id").trim() {
            "" => Uuid::new_v4(),
            raw => Uuid::parse_str(raw)
                .map_err(|e| parse_error(format!("invalid id {:?}: {}", raw, e)))?,
        };

        let created_at = match self.get(record, "created_at").trim() {
            "" => Utc::now(),
            raw => DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| parse_error(format!("invalid created_at {:?}: {}", raw, e)))?,
        };

        let contact = Contact::with_id(id, self.get(record, "name"), created_at)
            .with_phone(self.get(record, "phone"))
            .with_email(self.get(record, "email"))
            .with_address(self.get(record, "address"))
            .with_notes(self.get(record, "notes"));

        contact.validate().map_err(|e| parse_error(e.to_string()))?;
        Ok(contact)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonImporter;

/// Either a bare array of contacts or a whole list file
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonInput {
    Contacts(Vec<Contact>),
    ListFile {
        version: u32,
        contacts: Vec<Contact>,
    },
}

impl ContactImporter for JsonImporter {
    fn parse(&self, content: &str) -> Result<Vec<Contact>> {
        let contacts = match serde_json::from_str(content)? {
            JsonInput::Contacts(contacts) => contacts,
            JsonInput::ListFile { version, contacts } => {
                if version != STORE_VERSION {
                    return Err(Error::UnsupportedVersion { version });
                }
                contacts
            }
        };
        Ok(contacts)
    }

    fn format(&self) -> ImportFormat {
        ImportFormat::Json
    }
}
