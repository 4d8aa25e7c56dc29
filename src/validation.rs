//! Field rules for the student form.
//!
//! Each field is checked on its own. Rules run in order (required first, then the pattern) and
//! only the first failure for a field is reported.

use crate::data::student::StudentDraft;
use email_address::EmailAddress;
use serde::Deserialize;
use snafu::{Snafu, ensure};
use std::collections::BTreeMap;

const FORBIDDEN_NAME_CHARACTERS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*', '(', ')'];

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FirstName,
    LastName,
    Email,
}

impl Field {
    pub const ALL: [Self; 3] = [Self::FirstName, Self::LastName, Self::Email];

    /// Form/JSON key.
    pub const fn name(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email address",
        }
    }
}

#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[snafu(display("{} is a required field", field.name()))]
    Required { field: Field },
    #[snafu(display("{} must not contain numbers or special characters", field.label()))]
    ForbiddenCharacters { field: Field },
    #[snafu(display("{} must be a valid email", field.name()))]
    InvalidEmail { field: Field },
}

pub type FieldErrors = BTreeMap<Field, ValidationError>;

pub fn validate_field(field: Field, value: &str) -> Result<(), ValidationError> {
    ensure!(!value.is_empty(), RequiredSnafu { field });

    match field {
        Field::FirstName | Field::LastName => {
            ensure!(
                value.chars().all(is_name_character),
                ForbiddenCharactersSnafu { field }
            );
        }
        Field::Email => {
            ensure!(is_email(value), InvalidEmailSnafu { field });
        }
    }

    Ok(())
}

/// Checks every field, collecting one error per failing field.
pub fn validate_draft(draft: &StudentDraft) -> Result<(), FieldErrors> {
    let errors: FieldErrors = Field::ALL
        .into_iter()
        .filter_map(|field| {
            validate_field(field, draft.field(field))
                .err()
                .map(|e| (field, e))
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_name_character(c: char) -> bool {
    !c.is_ascii_digit() && !c.is_whitespace() && !FORBIDDEN_NAME_CHARACTERS.contains(&c)
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) || !EmailAddress::is_valid(value) {
        return false;
    }

    value
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.'))
}
