//! The student detail form: which mode it is in, what the user has typed so
//! far, the checks run before anything is sent, and what happens on submit.

use crate::{
    api::StudentsApi,
    data::{
        student::{FieldValue, Student, StudentPayload, Supplied},
        validation::FieldErrors,
    },
    error::{RosterError, RosterResult},
};
use serde_json::Value;
use std::time::Duration;

/// How long the "saved" banner stays up before going back to the list.
pub const SAVED_REDIRECT_DELAY: Duration = Duration::from_millis(1500);
pub const SUBMIT_FAILED: &str = "Failed to save. Please try again.";

pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];
pub const YEAR_LEVELS: [&str; 5] = ["1st", "2nd", "3rd", "4th", "5th"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    New,
    Existing(i64),
}

impl FormTarget {
    /// Id segment that addresses a student which doesn't exist yet.
    pub const NEW: &'static str = "new";

    pub fn parse(raw: &str) -> RosterResult<Self> {
        if raw == Self::NEW {
            return Ok(Self::New);
        }
        raw.parse()
            .map(Self::Existing)
            .map_err(|_| RosterError::InvalidStudentId {
                original: raw.to_string(),
            })
    }

    pub fn path_segment(self) -> String {
        match self {
            Self::New => Self::NEW.to_string(),
            Self::Existing(id) => id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    View,
    Edit,
}

/// Which mode the caller asked for. `edit` wins over `view`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeHint {
    pub view: bool,
    pub edit: bool,
}

/// Form fields exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDraft {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: String,
    pub age: String,
    pub gender: String,
    pub course: String,
    pub year_level: String,
    pub section: String,
}

impl From<&Student> for StudentDraft {
    fn from(student: &Student) -> Self {
        Self {
            first_name: student.first_name.clone(),
            middle_name: student.middle_name.clone().unwrap_or_default(),
            last_name: student.last_name.clone(),
            email: student.email.clone(),
            age: student.age.to_string(),
            gender: student.gender.clone(),
            course: student.course.clone(),
            year_level: student.year_level.clone(),
            section: student.section.clone(),
        }
    }
}

/// Reads an integer the way a browser's `parseInt` does: optional sign,
/// then digits, ignoring anything after them.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// `\S+@\S+\.\S+`, unanchored.
fn looks_like_email(raw: &str) -> bool {
    let chars: Vec<char> = raw.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == '@')
        .any(|(at, _)| {
            if at == 0 || chars[at - 1].is_whitespace() {
                return false;
            }
            let rest = &chars[at + 1..];
            let run = rest.iter().take_while(|c| !c.is_whitespace()).count();
            (1..run).any(|dot| rest[dot] == '.' && dot + 1 < run)
        })
}

fn text(raw: &str) -> Supplied<String> {
    String::from_json(Value::String(raw.to_string()))
}

impl StudentDraft {
    /// Everything the user can see is sent, so an emptied middle name clears it.
    pub fn to_payload(&self) -> StudentPayload {
        StudentPayload {
            email: text(&self.email),
            first_name: text(&self.first_name),
            last_name: text(&self.last_name),
            middle_name: text(&self.middle_name),
            age: parse_leading_int(&self.age)
                .and_then(|n| i32::try_from(n).ok())
                .map_or(Supplied::WrongType, Supplied::Given),
            gender: text(&self.gender),
            course: text(&self.course),
            year_level: text(&self.year_level),
            section: text(&self.section),
        }
    }

    fn field_mut(&mut self, field: &str) -> Option<&mut String> {
        Some(match field {
            "firstName" => &mut self.first_name,
            "middleName" => &mut self.middle_name,
            "lastName" => &mut self.last_name,
            "email" => &mut self.email,
            "age" => &mut self.age,
            "gender" => &mut self.gender,
            "course" => &mut self.course,
            "yearLevel" => &mut self.year_level,
            "section" => &mut self.section,
            _ => return None,
        })
    }

    /// Same checks the server makes, in browser terms. Every failing field is
    /// reported, not just the first.
    pub fn check(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let mut require = |field: &'static str, value: &str, message: &str| {
            if value.trim().is_empty() {
                errors.insert(field, message.to_string());
            }
        };

        require("firstName", &self.first_name, "First name is required");
        require("lastName", &self.last_name, "Last name is required");
        require("gender", &self.gender, "Gender is required");
        require("course", &self.course, "Course is required");
        require("yearLevel", &self.year_level, "Year level is required");
        require("section", &self.section, "Section is required");

        if self.email.trim().is_empty() {
            errors.insert("email", "Email is required".to_string());
        } else if !looks_like_email(&self.email) {
            errors.insert("email", "Invalid email format".to_string());
        }

        if self.age.is_empty() {
            errors.insert("age", "Age is required".to_string());
        } else if parse_leading_int(&self.age).is_none_or(|age| age < 1) {
            errors.insert("age", "Age must be a valid number".to_string());
        }

        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Read-only forms have nothing to submit.
    Unavailable,
    /// Client-side checks failed; nothing was sent.
    Invalid,
    /// The server rejected one or more fields.
    Rejected,
    /// Anything else went wrong; the user can retry.
    Failed,
    Saved(Student),
}

#[derive(Debug, Clone)]
pub struct FormController {
    target: FormTarget,
    mode: FormMode,
    draft: StudentDraft,
    errors: FieldErrors,
    submit_error: Option<&'static str>,
    saved: Option<Student>,
}

impl FormController {
    pub fn new(target: FormTarget, hint: ModeHint) -> Self {
        let mode = match target {
            FormTarget::New => FormMode::Create,
            FormTarget::Existing(_) if hint.edit => FormMode::Edit,
            FormTarget::Existing(_) if hint.view => FormMode::View,
            FormTarget::Existing(_) => FormMode::Edit,
        };

        Self {
            target,
            mode,
            draft: StudentDraft::default(),
            errors: FieldErrors::new(),
            submit_error: None,
            saved: None,
        }
    }

    /// Fills the form from a fetched record.
    pub fn load(&mut self, student: &Student) {
        self.draft = StudentDraft::from(student);
    }

    pub const fn target(&self) -> FormTarget {
        self.target
    }

    pub const fn mode(&self) -> FormMode {
        self.mode
    }

    pub const fn draft(&self) -> &StudentDraft {
        &self.draft
    }

    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub const fn submit_error(&self) -> Option<&'static str> {
        self.submit_error
    }

    pub const fn saved(&self) -> Option<&Student> {
        self.saved.as_ref()
    }

    pub const fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add New Student",
            FormMode::View => "Student Details",
            FormMode::Edit => "Edit Student",
        }
    }

    pub const fn can_toggle(&self) -> bool {
        matches!(self.target, FormTarget::Existing(_))
    }

    /// Flips between viewing and editing an existing student. Purely local.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            FormMode::View => FormMode::Edit,
            FormMode::Edit => FormMode::View,
            FormMode::Create => FormMode::Create,
        };
    }

    /// Records a keystroke and clears any error shown for that field.
    pub fn edit_field(&mut self, field: &str, value: impl Into<String>) {
        if let Some(slot) = self.draft.field_mut(field) {
            *slot = value.into();
            self.errors.remove(field);
        }
    }

    pub fn validate(&mut self) -> bool {
        self.errors = self.draft.check();
        self.errors.is_empty()
    }

    pub async fn submit(&mut self, api: &StudentsApi) -> SubmitOutcome {
        if self.mode == FormMode::View {
            return SubmitOutcome::Unavailable;
        }
        self.submit_error = None;
        if !self.validate() {
            return SubmitOutcome::Invalid;
        }

        let payload = self.draft.to_payload();
        let result = match self.target {
            FormTarget::New => api.create(payload).await,
            FormTarget::Existing(id) => api.update(id, payload).await,
        };

        match result {
            Ok(student) => {
                self.saved = Some(student.clone());
                SubmitOutcome::Saved(student)
            }
            Err(e) => {
                if let Some(errors) = e.field_errors() {
                    self.errors.extend(errors);
                    SubmitOutcome::Rejected
                } else {
                    warn!(?e, "Error saving student");
                    self.submit_error = Some(SUBMIT_FAILED);
                    SubmitOutcome::Failed
                }
            }
        }
    }
}
