//! Validation outcome types.

use serde::{Deserialize, Serialize};

use slabtrack_domain::RecordField;

/// Machine-readable reason for a validation issue.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    MinValue,
    MaxValue,
    RequiredField,
    InvalidFormat,
    InvalidDateOrder,
    DuplicateValue,
    NegativeValue,
    ZeroValue,
    HighValue,
    FutureDate,
    MissingData,
}

impl ValidationCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationCode::MinValue => "MIN_VALUE",
            ValidationCode::MaxValue => "MAX_VALUE",
            ValidationCode::RequiredField => "REQUIRED_FIELD",
            ValidationCode::InvalidFormat => "INVALID_FORMAT",
            ValidationCode::InvalidDateOrder => "INVALID_DATE_ORDER",
            ValidationCode::DuplicateValue => "DUPLICATE_VALUE",
            ValidationCode::NegativeValue => "NEGATIVE_VALUE",
            ValidationCode::ZeroValue => "ZERO_VALUE",
            ValidationCode::HighValue => "HIGH_VALUE",
            ValidationCode::FutureDate => "FUTURE_DATE",
            ValidationCode::MissingData => "MISSING_DATA",
        }
    }
}

/// One finding: the offending field, a human-readable message, and a code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub field: RecordField,
    pub message: String,
    pub code: ValidationCode,
}

impl ValidationIssue {
    pub fn new(field: RecordField, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }
}

/// Collected errors and warnings from one validation pass.
///
/// Errors block persistence; warnings are informational.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(
        &mut self,
        field: RecordField,
        code: ValidationCode,
        message: impl Into<String>,
    ) {
        self.errors.push(ValidationIssue::new(field, code, message));
    }

    pub fn warning(
        &mut self,
        field: RecordField,
        code: ValidationCode,
        message: impl Into<String>,
    ) {
        self.warnings.push(ValidationIssue::new(field, code, message));
    }

    /// Fold another report's findings into this one.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// All error messages joined for surfacing through a store error.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field.name(), e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
