//! Query-string filtering over application records.
//!
//! A query is a set of `field=substring` pairs. A record passes only if every
//! pair matches, case-insensitively. Repeating a key ANDs its values, so
//! `?title=app&title=two` needs both substrings in the title.
//!
//! | Key | Matched against |
//! |---|---|
//! | `title`, `version`, `company`, `website`, `source`, `license`, `description` | that field |
//! | `maintainer.name`, `maintainer.email` | any maintainer's name / email |
//!
//! Unknown keys match nothing.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::model::{Application, Maintainer};

/// A filterable field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Field {
    Title,
    Version,
    Company,
    Website,
    Source,
    License,
    Description,
    MaintainerName,
    MaintainerEmail,
}

/// How to pull text out of a record for a given [`Field`].
enum Accessor {
    Scalar(fn(&Application) -> &str),
    AnyMaintainer(fn(&Maintainer) -> &str),
}

impl Field {
    fn accessor(self) -> Accessor {
        match self {
            Self::Title => Accessor::Scalar(|app| app.title.as_str()),
            Self::Version => Accessor::Scalar(|app| app.version.as_str()),
            Self::Company => Accessor::Scalar(|app| app.company.as_str()),
            Self::Website => Accessor::Scalar(|app| app.website.as_str()),
            Self::Source => Accessor::Scalar(|app| app.source.as_str()),
            Self::License => Accessor::Scalar(|app| app.license.as_str()),
            Self::Description => Accessor::Scalar(|app| app.description.as_str()),
            Self::MaintainerName => Accessor::AnyMaintainer(|m| m.name.as_str()),
            Self::MaintainerEmail => Accessor::AnyMaintainer(|m| m.email.as_str()),
        }
    }

    /// True if this field of `app` contains `needle`, ignoring case.
    pub fn matches(self, needle: &str, app: &Application) -> bool {
        let needle = needle.to_lowercase();
        match self.accessor() {
            Accessor::Scalar(get) => contains_folded(get(app), &needle),
            Accessor::AnyMaintainer(get) => {
                app.maintainers.iter().any(|m| contains_folded(get(m), &needle))
            }
        }
    }
}

impl FromStr for Field {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title"            => Ok(Self::Title),
            "version"          => Ok(Self::Version),
            "company"          => Ok(Self::Company),
            "website"          => Ok(Self::Website),
            "source"           => Ok(Self::Source),
            "license"          => Ok(Self::License),
            "description"      => Ok(Self::Description),
            "maintainer.name"  => Ok(Self::MaintainerName),
            "maintainer.email" => Ok(Self::MaintainerEmail),
            _                  => Err(()),
        }
    }
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    haystack.to_lowercase().contains(folded_needle)
}

/// Evaluates one `field=value` predicate. Unknown field names never match.
pub fn matches(field: &str, value: &str, app: &Application) -> bool {
    field.parse::<Field>().is_ok_and(|f| f.matches(value, app))
}

/// A parsed filter query: field name to every value given for it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Query {
    pairs: BTreeMap<String, Vec<String>>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw, form-url-encoded query string (without the leading `?`).
    pub fn parse(raw: &str) -> Self {
        form_urlencoded::parse(raw.as_bytes())
            .fold(Self::new(), |q, (k, v)| q.with(k.into_owned(), v.into_owned()))
    }

    /// Adds one `field=value` pair. Returns `self` for chaining.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.entry(field.into()).or_default().push(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// True if `app` satisfies every pair in the query.
    pub fn matches(&self, app: &Application) -> bool {
        self.pairs
            .iter()
            .all(|(field, values)| values.iter().all(|v| matches(field, v, app)))
    }
}
