//! Search queries over contact fields.
//!
//! A query string is a comma-separated list of filters. Each filter is either
//! `field=pattern`, matching when `pattern` occurs in that field, or a bare
//! `pattern`, matching when it occurs in any field. Matching is a
//! case-insensitive substring test and every filter must match.

use crate::contact::{Contact, ContactField};
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A single `field=pattern` condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    /// `None` matches against every field
    pub field: Option<ContactField>,
    pattern: String,
    needle: String,
}

impl QueryFilter {
    pub fn new(field: Option<ContactField>, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into().trim().to_string();
        let needle = pattern.to_lowercase();
        Self {
            field,
            pattern,
            needle,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        match self.field {
            Some(field) => self.matches_field(field, contact),
            None => ContactField::ALL
                .into_iter()
                .any(|field| self.matches_field(field, contact)),
        }
    }

    fn matches_field(&self, field: ContactField, contact: &Contact) -> bool {
        field
            .value(contact)
            .map(|value| value.to_lowercase().contains(&self.needle))
            .unwrap_or(false)
    }
}

impl fmt::Display for QueryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(field) => write!(f, "{}={}", field, self.pattern),
            None => f.write_str(&self.pattern),
        }
    }
}

/// A parsed search query; all filters must match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    filters: Vec<QueryFilter>,
}

impl Query {
    /// Parse a query string such as `name=ada,email=example.org`
    pub fn parse(query: &str) -> Result<Self> {
        let malformed = || Error::MalformedQuery {
            query: query.to_string(),
        };

        if query.trim().is_empty() {
            return Err(malformed());
        }

        let mut filters = Vec::new();
        for part in query.split(',') {
            let filter = match part.split_once('=') {
                Some((field, pattern)) => {
                    if field.trim().is_empty() || pattern.trim().is_empty() {
                        return Err(malformed());
                    }
                    QueryFilter::new(Some(field.parse()?), pattern)
                }
                None => {
                    if part.trim().is_empty() {
                        return Err(malformed());
                    }
                    QueryFilter::new(None, part)
                }
            };
            filters.push(filter);
        }

        Ok(Self { filters })
    }

    /// Query from already-built filters; an empty list matches everything
    pub fn from_filters(filters: Vec<QueryFilter>) -> Self {
        Self { filters }
    }

    pub fn filters(&self) -> &[QueryFilter] {
        &self.filters
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        self.filters.iter().all(|filter| filter.matches(contact))
    }
}

impl FromStr for Query {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.filters.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Contact {
        Contact::new("Ada Lovelace")
            .with_email("ada@analytical.engine")
            .with_phone("+44 20 7946 0958")
            .with_address("12 St James's Square, London")
    }

    #[test]
    fn test_parse_field_filters() -> Result<()> {
        let query = Query::parse(" name = Ada , email=ENGINE")?;

        assert_eq!(query.filters().len(), 2);
        assert_eq!(query.filters()[0].field, Some(ContactField::Name));
        assert_eq!(query.filters()[0].pattern(), "Ada");
        assert_eq!(query.filters()[1].field, Some(ContactField::Email));
        assert_eq!(query.to_string(), "name=Ada,email=ENGINE");
        Ok(())
    }

    #[test]
    fn test_only_first_equals_splits() -> Result<()> {
        let query = Query::parse("notes=a=b")?;
        assert_eq!(query.filters()[0].pattern(), "a=b");
        Ok(())
    }

    #[test]
    fn test_malformed_queries() {
        for input in ["", "   ", "=ada", "name=", "name=ada,", ",name=ada"] {
            assert!(
                matches!(Query::parse(input), Err(Error::MalformedQuery { .. })),
                "expected {:?} to be malformed",
                input
            );
        }
    }

    #[test]
    fn test_unknown_field() {
        match Query::parse("nickname=ada") {
            Err(Error::UnknownQueryField { field }) => assert_eq!(field, "nickname"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_matching_is_case_insensitive_substring() -> Result<()> {
        let contact = ada();

        assert!(Query::parse("name=lovel")?.matches(&contact));
        assert!(Query::parse("email=ANALYTICAL")?.matches(&contact));
        assert!(Query::parse("name=ada,phone=7946")?.matches(&contact));
        assert!(!Query::parse("name=ada,phone=555")?.matches(&contact));
        Ok(())
    }

    #[test]
    fn test_unset_field_never_matches() -> Result<()> {
        let contact = Contact::new("Nobody");
        assert!(!Query::parse("notes=x")?.matches(&contact));
        Ok(())
    }

    #[test]
    fn test_bare_term_matches_any_field() -> Result<()> {
        let contact = ada();

        assert!(Query::parse("london")?.matches(&contact));
        assert!(Query::parse("0958")?.matches(&contact));
        assert!(!Query::parse("paris")?.matches(&contact));
        Ok(())
    }

    #[test]
    fn test_empty_filter_list_matches_everything() {
        assert!(Query::from_filters(Vec::new()).matches(&ada()));
    }
}
