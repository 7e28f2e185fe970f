//! Field rules shared by the create and update paths.
//!
//! Checking is split in two: [`check`] runs every rule that needs nothing but
//! the payload, and [`validate_new`]/[`validate_patch`] add the one rule that
//! needs the store (email uniqueness) before deciding.

use crate::{
    data::student::{FieldValue, NewStudent, StudentPatch, StudentPayload, Supplied},
    error::{RosterError, RosterResult},
    store::StudentStore,
};
use email_address::{EmailAddress, Options};
use std::collections::BTreeMap;

/// Wire field name to a human-readable message.
pub type FieldErrors = BTreeMap<&'static str, String>;

pub const EMAIL_TAKEN: &str = "The email has already been taken.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update { id: i64 },
}

/// `yearLevel` -> `year level`
fn label(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 2);
    for c in field.chars() {
        if c.is_uppercase() {
            out.push(' ');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

struct Checker {
    mode: Mode,
    errors: FieldErrors,
}

impl Checker {
    fn required<T: FieldValue>(&mut self, field: &'static str, value: Supplied<T>) -> Option<T> {
        match value {
            Supplied::Given(v) => Some(v),
            Supplied::Absent if matches!(self.mode, Mode::Update { .. }) => None,
            Supplied::Absent | Supplied::Null => {
                self.errors
                    .insert(field, format!("The {} field is required.", label(field)));
                None
            }
            Supplied::WrongType => {
                self.errors
                    .insert(field, format!("The {} field must be {}.", label(field), T::KIND));
                None
            }
        }
    }

    fn optional(&mut self, field: &'static str, value: Supplied<String>) -> Option<Option<String>> {
        match value {
            Supplied::Absent => None,
            Supplied::Null => Some(None),
            Supplied::Given(v) => Some(Some(v)),
            Supplied::WrongType => {
                self.errors
                    .insert(field, format!("The {} field must be a string.", label(field)));
                None
            }
        }
    }

    fn email(&mut self, value: Supplied<String>) -> Option<String> {
        let email = self.required("email", value)?;
        // a bare address only, no `Name <addr>` and no `[127.0.0.1]` domains
        let options = Options::default()
            .without_display_text()
            .without_domain_literal();
        if EmailAddress::parse_with_options(&email, options).is_err() {
            self.errors.insert(
                "email",
                "The email field must be a valid email address.".to_string(),
            );
            return None;
        }
        Some(email)
    }
}

/// Runs every store-independent rule. The returned patch holds each field
/// that passed; the error map holds every field that did not.
pub fn check(payload: StudentPayload, mode: Mode) -> (StudentPatch, FieldErrors) {
    let StudentPayload {
        email,
        first_name,
        last_name,
        middle_name,
        age,
        gender,
        course,
        year_level,
        section,
    } = payload;

    let mut checker = Checker {
        mode,
        errors: FieldErrors::new(),
    };

    let patch = StudentPatch {
        email: checker.email(email),
        first_name: checker.required("firstName", first_name),
        last_name: checker.required("lastName", last_name),
        middle_name: checker.optional("middleName", middle_name),
        age: checker.required("age", age),
        gender: checker.required("gender", gender),
        course: checker.required("course", course),
        year_level: checker.required("yearLevel", year_level),
        section: checker.required("section", section),
    };

    (patch, checker.errors)
}

async fn check_email_is_free(
    store: &dyn StudentStore,
    email: Option<&str>,
    mode: Mode,
    errors: &mut FieldErrors,
) -> RosterResult<()> {
    let Some(email) = email else {
        return Ok(());
    };

    let owner = store.email_owner(email).await?;
    let clashes = match (owner, mode) {
        (None, _) => false,
        (Some(owner), Mode::Update { id }) => owner != id,
        (Some(_), Mode::Create) => true,
    };
    if clashes {
        errors.insert("email", EMAIL_TAKEN.to_string());
    }
    Ok(())
}

pub async fn validate_new(
    payload: StudentPayload,
    store: &dyn StudentStore,
) -> RosterResult<NewStudent> {
    let (patch, mut errors) = check(payload, Mode::Create);
    check_email_is_free(store, patch.email.as_deref(), Mode::Create, &mut errors).await?;

    match patch.into_new() {
        Some(new) if errors.is_empty() => Ok(new),
        _ => Err(RosterError::Validation { errors }),
    }
}

pub async fn validate_patch(
    id: i64,
    payload: StudentPayload,
    store: &dyn StudentStore,
) -> RosterResult<StudentPatch> {
    let mode = Mode::Update { id };
    let (patch, mut errors) = check(payload, mode);
    check_email_is_free(store, patch.email.as_deref(), mode, &mut errors).await?;

    snafu::ensure!(errors.is_empty(), crate::error::ValidationSnafu { errors });
    Ok(patch)
}
