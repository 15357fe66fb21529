//! Contact records and field validation.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable contact identifier
pub type ContactId = Uuid;

/// A single entry in a contact list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    /// Create a contact with a fresh id and creation time
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, Utc::now())
    }

    /// Create a contact whose identity already exists, e.g. when importing
    pub fn with_id(id: ContactId, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into().trim().to_string(),
            phone: None,
            email: None,
            address: None,
            notes: None,
            created_at,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = normalize_optional(Some(phone.into()));
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = normalize_optional(Some(email.into()));
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = normalize_optional(Some(address.into()));
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = normalize_optional(Some(notes.into()));
        self
    }

    /// Trim surrounding whitespace and turn blank optional fields into `None`.
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.phone = normalize_optional(self.phone.take());
        self.email = normalize_optional(self.email.take());
        self.address = normalize_optional(self.address.take());
        self.notes = normalize_optional(self.notes.take());
    }

    /// Check the field rules every stored contact must satisfy.
    ///
    /// Expects a normalized contact; surrounding whitespace counts against
    /// phone and email.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_contact("name must not be empty"));
        }

        if let Some(ref phone) = self.phone {
            validate_phone(phone)?;
        }

        if let Some(ref email) = self.email {
            validate_email(email)?;
        }

        Ok(())
    }

    /// Short form of the id used in listings and accepted as a lookup prefix
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(ref email) = self.email {
            write!(f, " <{}>", email)?;
        }
        if let Some(ref phone) = self.phone {
            write!(f, " ({})", phone)?;
        }
        Ok(())
    }
}

/// Searchable contact fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Id,
    Name,
    Phone,
    Email,
    Address,
    Notes,
}

impl ContactField {
    pub const ALL: [ContactField; 6] = [
        ContactField::Id,
        ContactField::Name,
        ContactField::Phone,
        ContactField::Email,
        ContactField::Address,
        ContactField::Notes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContactField::Id => "id",
            ContactField::Name => "name",
            ContactField::Phone => "phone",
            ContactField::Email => "email",
            ContactField::Address => "address",
            ContactField::Notes => "notes",
        }
    }

    /// Value of this field on `contact`, `None` when the field is unset
    pub fn value<'a>(self, contact: &'a Contact) -> Option<Cow<'a, str>> {
        match self {
            ContactField::Id => Some(Cow::Owned(contact.id.to_string())),
            ContactField::Name => Some(Cow::Borrowed(contact.name.as_str())),
            ContactField::Phone => contact.phone.as_deref().map(Cow::Borrowed),
            ContactField::Email => contact.email.as_deref().map(Cow::Borrowed),
            ContactField::Address => contact.address.as_deref().map(Cow::Borrowed),
            ContactField::Notes => contact.notes.as_deref().map(Cow::Borrowed),
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ContactField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownQueryField {
                field: wanted.to_string(),
            })
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_phone(phone: &str) -> Result<()> {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.');

    if let Some(bad) = phone.chars().find(|&c| !allowed(c)) {
        return Err(Error::invalid_contact(format!(
            "phone number {:?} contains invalid character {:?}",
            phone, bad
        )));
    }

    if !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(Error::invalid_contact(format!(
            "phone number {:?} contains no digits",
            phone
        )));
    }

    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    if email.chars().any(char::is_whitespace) {
        return Err(Error::invalid_contact(format!(
            "email address {:?} contains whitespace",
            email
        )));
    }

    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => Err(Error::invalid_contact(format!(
            "email address {:?} must look like user@domain",
            email
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_normalizes_fields() {
        let contact = Contact::new("  Ada Lovelace ")
            .with_phone(" +44 20 7946 0958 ")
            .with_email("ada@example.org")
            .with_notes("   ");

        assert_eq!(contact.name, "Ada Lovelace");
        assert_eq!(contact.phone.as_deref(), Some("+44 20 7946 0958"));
        assert_eq!(contact.notes, None);
        assert!(contact.validate().is_ok());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let contact = Contact::new("   ");
        assert!(matches!(
            contact.validate(),
            Err(Error::InvalidContact { .. })
        ));
    }

    #[test]
    fn test_phone_validation() {
        assert!(validate_phone("(555) 010-0199").is_ok());
        assert!(validate_phone("+1.555.0100").is_ok());
        assert!(validate_phone("555-CALL").is_err());
        assert!(validate_phone("+ ()").is_err());
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("grace@navy.mil").is_ok());
        assert!(validate_email("localhost@intranet").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@b@c").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }

    #[test]
    fn test_field_parsing_is_case_insensitive() -> Result<()> {
        assert_eq!("EMAIL".parse::<ContactField>()?, ContactField::Email);
        assert_eq!(" notes ".parse::<ContactField>()?, ContactField::Notes);

        match "nickname".parse::<ContactField>() {
            Err(Error::UnknownQueryField { field }) => assert_eq!(field, "nickname"),
            other => panic!("unexpected result: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_field_values() {
        let contact = Contact::new("Linus").with_email("linus@example.com");

        assert_eq!(
            ContactField::Email.value(&contact).as_deref(),
            Some("linus@example.com")
        );
        assert_eq!(ContactField::Phone.value(&contact), None);
        assert_eq!(
            ContactField::Id.value(&contact).as_deref(),
            Some(contact.id.to_string().as_str())
        );
    }

    #[test]
    fn test_display_and_short_id() {
        let contact = Contact::new("Margaret").with_phone("555 0100");
        assert_eq!(contact.to_string(), "Margaret (555 0100)");
        assert_eq!(contact.short_id().len(), 8);
        assert!(contact.id.to_string().starts_with(&contact.short_id()));
    }
}
