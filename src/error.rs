use crate::data::validation::{EMAIL_TAKEN, FieldErrors};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use snafu::Snafu;
use std::num::ParseIntError;

pub type RosterResult<T> = Result<T, RosterError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RosterError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    Migrate { source: sqlx::migrate::MigrateError },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse `{}` as a number", name))]
    ParseNumber {
        source: ParseIntError,
        name: &'static str,
    },
    #[snafu(display("Unknown store kind {:?}, expected `postgres` or `memory`", original))]
    UnknownStoreKind { original: String },
    #[snafu(display("Unable to find student with ID: {}", id))]
    MissingStudent { id: i64 },
    #[snafu(display("{:?} is not a student ID", original))]
    InvalidStudentId { original: String },
    #[snafu(display("Email {:?} already belongs to another student", email))]
    EmailTaken { email: String },
    #[snafu(display("Student failed validation on {} field(s)", errors.len()))]
    Validation { errors: FieldErrors },
    #[snafu(display("Unable to read request body"))]
    MalformedBody { source: JsonRejection },
}

impl RosterError {
    /// Per-field messages for errors the caller can fix by changing their input.
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            Self::Validation { errors } => Some(errors.clone()),
            Self::EmailTaken { .. } => {
                Some(FieldErrors::from([("email", EMAIL_TAKEN.to_string())]))
            }
            _ => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::UNPROCESSABLE_ENTITY; //bad input

        match self {
            Self::OpenDatabase { .. } | Self::MakeQuery { .. } | Self::Migrate { .. } => ISE,
            Self::BadEnvVar { .. } | Self::ParseNumber { .. } | Self::UnknownStoreKind { .. } => {
                ISE
            }
            Self::MissingStudent { .. } | Self::InvalidStudentId { .. } => NF,
            Self::EmailTaken { .. } | Self::Validation { .. } | Self::MalformedBody { .. } => BI,
        }
    }
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            error!(?self, "Error!");
        } else {
            debug!(?self, "Rejected request");
        }

        let body = if let Some(errors) = self.field_errors() {
            json!(errors)
        } else {
            match &self {
                Self::MalformedBody { source } => json!({ "body": source.body_text() }),
                Self::MissingStudent { id } => {
                    json!({ "message": format!("Student {id} not found") })
                }
                Self::InvalidStudentId { .. } => json!({ "message": self.to_string() }),
                _ => json!({ "message": "Internal server error" }),
            }
        };

        (status_code, Json(body)).into_response()
    }
}
