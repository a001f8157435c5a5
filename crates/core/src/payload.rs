//! Incoming submission payloads.
//!
//! Deserialized straight from the request body, validated with `validator`,
//! then sanitized into the `(field, value)` pairs a [`Record`] is built from.
//! Length caps here mirror `limits.rs`.

use serde::Deserialize;
use validator::Validate;

use crate::error::{Error, Result};
use crate::limits::{
    MAX_COMPANY_LEN, MAX_EMAIL_LEN, MAX_INTEREST_LEN, MAX_MESSAGE_LEN, MAX_NAME_LEN,
    MAX_SUBJECT_LEN,
};
use crate::record::{IdGenerator, Record, RecordKind};
use crate::sanitize::sanitize_field;

/// Lead capture form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LeadPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 64))]
    pub interest: String,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

/// Contact form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(max = 150))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}

/// Investor inquiry form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InvestorPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(max = 150))]
    pub company: Option<String>,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

/// Common conversion: validate, sanitize every field, build the record.
pub trait Submission: Validate {
    fn kind(&self) -> RecordKind;

    /// Sanitized `(field, value)` pairs in display order.
    fn sanitized_fields(&self) -> Vec<(&'static str, String)>;

    fn into_record(self, ids: &IdGenerator) -> Result<Record>
    where
        Self: Sized,
    {
        self.validate()
            .map_err(|e| Error::validation(flatten_validation_errors(&e)))?;
        let fields = self.sanitized_fields();
        Ok(Record::new(ids, self.kind(), fields))
    }
}

impl Submission for LeadPayload {
    fn kind(&self) -> RecordKind {
        RecordKind::Lead
    }

    fn sanitized_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", sanitize_field(&self.name, MAX_NAME_LEN)),
            ("email", sanitize_field(&self.email, MAX_EMAIL_LEN)),
            ("interest", sanitize_field(&self.interest, MAX_INTEREST_LEN)),
        ];
        if let Some(message) = &self.message {
            fields.push(("message", sanitize_field(message, MAX_MESSAGE_LEN)));
        }
        fields
    }
}

impl Submission for ContactPayload {
    fn kind(&self) -> RecordKind {
        RecordKind::Contact
    }

    fn sanitized_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", sanitize_field(&self.name, MAX_NAME_LEN)),
            ("email", sanitize_field(&self.email, MAX_EMAIL_LEN)),
        ];
        if let Some(subject) = &self.subject {
            fields.push(("subject", sanitize_field(subject, MAX_SUBJECT_LEN)));
        }
        fields.push(("message", sanitize_field(&self.message, MAX_MESSAGE_LEN)));
        fields
    }
}

impl Submission for InvestorPayload {
    fn kind(&self) -> RecordKind {
        RecordKind::Investor
    }

    fn sanitized_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", sanitize_field(&self.name, MAX_NAME_LEN)),
            ("email", sanitize_field(&self.email, MAX_EMAIL_LEN)),
        ];
        if let Some(company) = &self.company {
            fields.push(("company", sanitize_field(company, MAX_COMPANY_LEN)));
        }
        if let Some(message) = &self.message {
            fields.push(("message", sanitize_field(message, MAX_MESSAGE_LEN)));
        }
        fields
    }
}

fn flatten_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let codes: Vec<&str> = errs.iter().map(|e| e.code.as_ref()).collect();
            format!("{}: {}", field, codes.join(", "))
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
