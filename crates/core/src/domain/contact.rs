use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Expected national-number digit counts per dialing code. Longest
/// prefix wins so "+1..." never shadows "+971...".
const COUNTRY_PHONE_RULES: &[(&str, usize)] = &[
    ("971", 9),
    ("966", 9),
    ("965", 8),
    ("968", 8),
    ("973", 8),
    ("974", 8),
    ("91", 10),
    ("44", 10),
    ("20", 10),
    ("1", 10),
];

/// One result from the address lookup collaborator. Opaque to the core
/// once selected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressCandidate {
    pub id: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    /// E.164-like, `+` followed by dialing code and national number.
    pub phone: String,
    pub address: Option<AddressCandidate>,
    pub notes: Option<String>,
}

impl ContactDetails {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().chars().count() < 2 {
            return Err(ValidationError::NameTooShort);
        }
        validate_phone(&self.phone)?;
        if self.address.is_none() {
            return Err(ValidationError::MissingAddress);
        }
        Ok(())
    }
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let trimmed = phone.trim();
    let digits = match trimmed.strip_prefix('+') {
        Some(rest) => rest,
        None => {
            return Err(ValidationError::InvalidPhone(format!(
                "`{trimmed}` must start with a country code prefix `+`"
            )));
        }
    };

    if !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ValidationError::InvalidPhone(format!("`{trimmed}` contains non-digits")));
    }

    let rule = COUNTRY_PHONE_RULES
        .iter()
        .filter(|(code, _)| digits.starts_with(code))
        .max_by_key(|(code, _)| code.len());

    match rule {
        Some((code, expected)) => {
            let national = digits.len() - code.len();
            if national == *expected {
                Ok(())
            } else {
                Err(ValidationError::InvalidPhone(format!(
                    "expected {expected} digits after +{code}, got {national}"
                )))
            }
        }
        None => Err(ValidationError::InvalidPhone(format!("unsupported country code in `{trimmed}`"))),
    }
}
