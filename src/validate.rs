//! Completeness and email checks for candidate records.
//!
//! Rules run in a fixed order and the first failure wins, so a record
//! missing both `title` and `company` always reports the title.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Application, Maintainer};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// The first rule a candidate record broke.
///
/// `Display` output is the exact message sent back to the client.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("ID cannot be patched")]
    IdPatched,
    #[error("title is required")]
    TitleRequired,
    #[error("version is required")]
    VersionRequired,
    #[error("at least one maintainer is required")]
    MaintainerRequired,
    #[error("maintainer name is required")]
    MaintainerNameRequired,
    #[error("maintainer email is required")]
    MaintainerEmailRequired,
    #[error("invalid maintainer email")]
    InvalidMaintainerEmail,
    #[error("company is required")]
    CompanyRequired,
    #[error("website is required")]
    WebsiteRequired,
    #[error("source is required")]
    SourceRequired,
    #[error("license is required")]
    LicenseRequired,
    #[error("description is required")]
    DescriptionRequired,
}

/// Checks `app` against every rule, returning the first violation.
///
/// With `is_update` set, a caller-supplied `id` is rejected: ids come from
/// the request path, never the body. On create the id is ignored since the
/// store has already assigned it.
pub fn validate(app: &Application, is_update: bool) -> Result<(), ValidationError> {
    if is_update && !app.id.is_empty() {
        return Err(ValidationError::IdPatched);
    }

    require(&app.title, ValidationError::TitleRequired)?;
    require(&app.version, ValidationError::VersionRequired)?;

    if app.maintainers.is_empty() {
        return Err(ValidationError::MaintainerRequired);
    }
    app.maintainers.iter().try_for_each(validate_maintainer)?;

    require(&app.company, ValidationError::CompanyRequired)?;
    require(&app.website, ValidationError::WebsiteRequired)?;
    require(&app.source, ValidationError::SourceRequired)?;
    require(&app.license, ValidationError::LicenseRequired)?;
    require(&app.description, ValidationError::DescriptionRequired)
}

fn validate_maintainer(maintainer: &Maintainer) -> Result<(), ValidationError> {
    require(&maintainer.name, ValidationError::MaintainerNameRequired)?;
    require(&maintainer.email, ValidationError::MaintainerEmailRequired)?;
    if !is_valid_email(&maintainer.email) {
        return Err(ValidationError::InvalidMaintainerEmail);
    }
    Ok(())
}

/// `local@domain.tld`, with a TLD of at least two letters.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn require(field: &str, err: ValidationError) -> Result<(), ValidationError> {
    if field.is_empty() { Err(err) } else { Ok(()) }
}
