//! Contact export formats: CSV, JSON and vCard.

use crate::contact::Contact;
use crate::store::write_atomic;
use crate::{Error, Result};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Column order shared by the CSV exporter and importer
pub const CSV_HEADER: [&str; 7] = [
    "id",
    "name",
    "phone",
    "email",
    "address",
    "notes",
    "created_at",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Vcf,
}

impl ExportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "vcf" | "vcard" => Some(Self::Vcf),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Vcf => "vcf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "vcf" | "vcard" => Ok(Self::Vcf),
            other => Err(Error::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

pub trait ContactExporter {
    /// Serialize contacts into the exporter's text format
    fn render(&self, contacts: &[Contact]) -> Result<String>;

    fn format(&self) -> ExportFormat;

    fn export_contacts(&self, contacts: &[Contact], output_path: &Path) -> Result<()> {
        info!(
            "Exporting {} contacts to {} format: {}",
            contacts.len(),
            self.format(),
            output_path.display()
        );

        let content = self.render(contacts)?;
        write_atomic(output_path, content.as_bytes())?;

        info!(
            "Successfully exported {} contacts to {}",
            contacts.len(),
            self.format()
        );
        Ok(())
    }
}

/// Exporter for the given format
pub fn exporter_for(format: ExportFormat) -> Box<dyn ContactExporter> {
    match format {
        ExportFormat::Csv => Box::new(CsvExporter),
        ExportFormat::Json => Box::new(JsonExporter),
        ExportFormat::Vcf => Box::new(VcfExporter),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvExporter;

impl ContactExporter for CsvExporter {
    fn render(&self, contacts: &[Contact]) -> Result<String> {
        let mut csv_content = String::new();

        csv_content.push_str(&CSV_HEADER.join(","));
        csv_content.push_str("\r\n");

        for contact in contacts {
            csv_content.push_str(&self.contact_to_csv_row(contact));
            csv_content.push_str("\r\n");
        }

        Ok(csv_content)
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }
}

impl CsvExporter {
    fn contact_to_csv_row(&self, contact: &Contact) -> String {
        let created_at = contact
            .created_at
            .to_rfc3339_opts(SecondsFormat::AutoSi, true);

        [
            contact.id.to_string().as_str(),
            contact.name.as_str(),
            contact.phone.as_deref().unwrap_or(""),
            contact.email.as_deref().unwrap_or(""),
            contact.address.as_deref().unwrap_or(""),
            contact.notes.as_deref().unwrap_or(""),
            created_at.as_str(),
        ]
        .iter()
        .map(|value| escape_csv_value(value))
        .collect::<Vec<_>>()
        .join(",")
    }
}

fn escape_csv_value(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExporter;

impl ContactExporter for JsonExporter {
    fn render(&self, contacts: &[Contact]) -> Result<String> {
        let mut json = serde_json::to_string_pretty(contacts)?;
        json.push('\n');
        Ok(json)
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct VcfExporter;

impl ContactExporter for VcfExporter {
    fn render(&self, contacts: &[Contact]) -> Result<String> {
        Ok(contacts
            .iter()
            .map(|contact| self.contact_to_vcf(contact))
            .collect())
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Vcf
    }
}

impl VcfExporter {
    fn contact_to_vcf(&self, contact: &Contact) -> String {
        let mut vcf = String::new();

        vcf.push_str("BEGIN:VCARD\r\n");
        vcf.push_str("VERSION:3.0\r\n");
        vcf.push_str(&format!("UID:{}\r\n", contact.id));
        vcf.push_str(&format!("FN:{}\r\n", escape_vcf_value(&contact.name)));

        // Structured name (Family;Given;Middle;Prefix;Suffix)
        let (given, family) = match contact.name.rsplit_once(' ') {
            Some((given, family)) => (given.trim(), family.trim()),
            None => (contact.name.as_str(), ""),
        };
        vcf.push_str(&format!(
            "N:{};{};;;\r\n",
            escape_vcf_value(family),
            escape_vcf_value(given)
        ));

        if let Some(ref phone) = contact.phone {
            vcf.push_str(&format!("TEL;TYPE=VOICE:{}\r\n", escape_vcf_value(phone)));
        }

        if let Some(ref email) = contact.email {
            vcf.push_str(&format!("EMAIL;TYPE=INTERNET:{}\r\n", escape_vcf_value(email)));
        }

        // Whole address goes in the street component
        if let Some(ref address) = contact.address {
            vcf.push_str(&format!("ADR:;;{};;;;\r\n", escape_vcf_value(address)));
        }

        if let Some(ref notes) = contact.notes {
            vcf.push_str(&format!("NOTE:{}\r\n", escape_vcf_value(notes)));
        }

        vcf.push_str("END:VCARD\r\n");

        vcf
    }
}

fn escape_vcf_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
        .replace('\r', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn fixed_contact() -> Contact {
        let id = Uuid::parse_str("6f1c2b9e-3a0d-4c59-9a8e-1d2f3e4a5b6c").unwrap();
        let created_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        Contact::with_id(id, "Ada Lovelace", created_at)
            .with_email("ada@example.org")
            .with_address("12 St James's Square, London")
            .with_notes("Said \"hello\"")
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ExportFormat::from_path(&PathBuf::from("out/list.CSV")),
            Some(ExportFormat::Csv)
        );
        assert_eq!(
            ExportFormat::from_path(&PathBuf::from("cards.vcard")),
            Some(ExportFormat::Vcf)
        );
        assert_eq!(ExportFormat::from_path(&PathBuf::from("notes.txt")), None);
        assert_eq!(ExportFormat::from_path(&PathBuf::from("noext")), None);
    }

    #[test]
    fn test_format_parsing() -> Result<()> {
        assert_eq!("JSON".parse::<ExportFormat>()?, ExportFormat::Json);
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(Error::UnsupportedFormat { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_csv_render() -> Result<()> {
        let csv = CsvExporter.render(&[fixed_contact()])?;
        let expected = "id,name,phone,email,address,notes,created_at\r\n\
            6f1c2b9e-3a0d-4c59-9a8e-1d2f3e4a5b6c,Ada Lovelace,,ada@example.org,\
            \"12 St James's Square, London\",\"Said \"\"hello\"\"\",2024-03-01T09:30:00Z\r\n";

        assert_eq!(csv, expected);
        Ok(())
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv_value("plain"), "plain");
        assert_eq!(escape_csv_value("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_value("line\nbreak"), "\"line\nbreak\"");
        assert_eq!(escape_csv_value("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_vcf_render() -> Result<()> {
        let vcf = VcfExporter.render(&[fixed_contact()])?;

        assert!(vcf.starts_with("BEGIN:VCARD\r\nVERSION:3.0\r\n"));
        assert!(vcf.contains("UID:6f1c2b9e-3a0d-4c59-9a8e-1d2f3e4a5b6c\r\n"));
        assert!(vcf.contains("FN:Ada Lovelace\r\n"));
        assert!(vcf.contains("N:Lovelace;Ada;;;\r\n"));
        assert!(vcf.contains("EMAIL;TYPE=INTERNET:ada@example.org\r\n"));
        assert!(vcf.contains("ADR:;;12 St James's Square\\, London;;;;\r\n"));
        assert!(!vcf.contains("TEL"));
        assert!(vcf.ends_with("END:VCARD\r\n"));
        Ok(())
    }

    #[test]
    fn test_vcf_escaping_does_not_double_escape() {
        assert_eq!(escape_vcf_value("a;b,c"), "a\\;b\\,c");
        assert_eq!(escape_vcf_value("back\\slash"), "back\\\\slash");
        assert_eq!(escape_vcf_value("two\r\nlines"), "two\\nlines");
    }

    #[test]
    fn test_json_render_is_array() -> Result<()> {
        let json = JsonExporter.render(&[fixed_contact()])?;
        let parsed: Vec<Contact> = serde_json::from_str(&json)?;
        assert_eq!(parsed, vec![fixed_contact()]);
        Ok(())
    }

    #[test]
    fn test_export_contacts_writes_file() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let path = temp_dir.path().join("contacts.vcf");

        exporter_for(ExportFormat::Vcf).export_contacts(&[fixed_contact()], &path)?;

        let content = std::fs::read_to_string(&path)?;
        assert_eq!(content.matches("BEGIN:VCARD").count(), 1);
        Ok(())
    }
}
