use std::str::FromStr;

use garde::Validate;
use serde::{Deserialize, Serialize};

pub const EMAIL_MAX_LENGTH: usize = 256;
pub const SLUG_MAX_LENGTH: usize = 64;
pub const SHORT_TEXT_MAX_LENGTH: usize = 50;

/// Domain must end in a top level label, `localhost` and `[ip]` literals excepted.
fn has_top_level_domain(value: &str, _ctx: &()) -> garde::Result {
    let domain = value.rsplit_once('@').map(|(_, d)| d).unwrap_or_default();
    if domain.eq_ignore_ascii_case("localhost")
        || (domain.starts_with('[') && domain.ends_with(']'))
    {
        return Ok(());
    }
    let tld = match domain.rsplit_once('.') {
        Some((rest, tld)) if !rest.is_empty() => tld,
        _ => return Err(garde::Error::new("domain has no top level part")),
    };
    let valid = (tld.len() >= 2 && tld.chars().all(|c| c.is_alphabetic()))
        || (tld.len() > 4
            && tld.to_ascii_lowercase().starts_with("xn--")
            && tld.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
    if valid {
        Ok(())
    } else {
        Err(garde::Error::new("invalid top level domain"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Validate, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[garde(transparent)]
pub struct ValidEmail(
    #[garde(email, length(chars, max = 256), custom(has_top_level_domain))] String,
);

/// Letters, digits, hyphens and underscores only.
#[derive(Debug, Clone, PartialEq, Eq, Validate, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[garde(transparent)]
pub struct ValidSlug(
    #[garde(
        length(chars, min = 1, max = 64),
        pattern(r"^[-a-zA-Z0-9_]+$")
    )]
    String,
);

/// Non-blank string of at most 50 characters.
#[derive(Debug, Clone, PartialEq, Eq, Validate, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[garde(transparent)]
pub struct ShortText(#[garde(length(chars, min = 1, max = 50))] String);

macro_rules! validated_string {
    ($name:ident) => {
        impl FromStr for $name {
            type Err = garde::Report;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = $name(s.to_string());
                value.validate()?;
                Ok(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

validated_string!(ValidEmail);
validated_string!(ValidSlug);
validated_string!(ShortText);
