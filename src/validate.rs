//! Client-side validation rules for ticket and comment forms.
//!
//! Rules run synchronously against raw form input before any request is
//! issued. A failing draft yields one message per offending field; the
//! server may still reject a draft that passes here.

use std::fmt;

use crate::types::{CommentCreate, Priority, TicketCreate, TicketUpdate};

// ============================================================================
// Constants
// ============================================================================

pub const TITLE_MIN_LENGTH: usize = 4;
pub const TITLE_MAX_LENGTH: usize = 100;
pub const DESCRIPTION_MIN_LENGTH: usize = 10;
pub const REPORTER_MIN_LENGTH: usize = 2;
pub const AUTHOR_MIN_LENGTH: usize = 2;
pub const COMMENT_MIN_LENGTH: usize = 2;
pub const COMMENT_MAX_LENGTH: usize = 500;

/// A single field violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field name to message mapping, in form order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|e| e.field).collect()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

// ============================================================================
// Field Rules
// ============================================================================

/// Length bounds for one field, in characters
struct LengthRule {
    field: &'static str,
    min: usize,
    max: Option<usize>,
    too_short: &'static str,
    too_long: &'static str,
}

impl LengthRule {
    fn check(&self, value: &str, errors: &mut ValidationErrors) {
        let len = value.chars().count();
        if len < self.min {
            errors.add(self.field, self.too_short);
        } else if let Some(max) = self.max
            && len > max
        {
            errors.add(self.field, self.too_long);
        }
    }
}

const TITLE_RULE: LengthRule = LengthRule {
    field: "title",
    min: TITLE_MIN_LENGTH,
    max: Some(TITLE_MAX_LENGTH),
    too_short: "Title must be at least 4 characters",
    too_long: "Title must not exceed 100 characters",
};

const DESCRIPTION_RULE: LengthRule = LengthRule {
    field: "description",
    min: DESCRIPTION_MIN_LENGTH,
    max: None,
    too_short: "Description must be at least 10 characters",
    too_long: "",
};

const REPORTER_RULE: LengthRule = LengthRule {
    field: "reporter",
    min: REPORTER_MIN_LENGTH,
    max: None,
    too_short: "Reporter name must be at least 2 characters",
    too_long: "",
};

const AUTHOR_RULE: LengthRule = LengthRule {
    field: "author",
    min: AUTHOR_MIN_LENGTH,
    max: None,
    too_short: "Author name must be at least 2 characters",
    too_long: "",
};

const BODY_RULE: LengthRule = LengthRule {
    field: "body",
    min: COMMENT_MIN_LENGTH,
    max: Some(COMMENT_MAX_LENGTH),
    too_short: "Comment must be at least 2 characters",
    too_long: "Comment must not exceed 500 characters",
};

const PRIORITY_MESSAGE: &str = "Priority must be one of LOW, MEDIUM, HIGH";

// ============================================================================
// Drafts
// ============================================================================

/// Raw ticket-creation form input.
///
/// The priority picker starts at `MEDIUM`; that default belongs to the form,
/// the server applies its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub reporter: String,
}

impl Default for TicketDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            priority: Priority::Medium.to_string(),
            reporter: String::new(),
        }
    }
}

impl TicketDraft {
    pub fn validate(&self) -> Result<TicketCreate, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        TITLE_RULE.check(&self.title, &mut errors);
        DESCRIPTION_RULE.check(&self.description, &mut errors);
        let priority = self.priority.parse::<Priority>().ok();
        if priority.is_none() {
            errors.add("priority", PRIORITY_MESSAGE);
        }
        REPORTER_RULE.check(&self.reporter, &mut errors);

        errors.into_result(|| TicketCreate {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: priority.unwrap_or(Priority::Medium),
            reporter: self.reporter.clone(),
        })
    }
}

/// Raw comment form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
    pub author: String,
    pub body: String,
}

impl CommentDraft {
    pub fn new(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            body: body.into(),
        }
    }

    pub fn validate(&self) -> Result<CommentCreate, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        AUTHOR_RULE.check(&self.author, &mut errors);
        BODY_RULE.check(&self.body, &mut errors);

        errors.into_result(|| CommentCreate {
            author: self.author.clone(),
            body: self.body.clone(),
        })
    }
}

/// Validate the fields present in a partial update with the creation rules.
pub fn validate_ticket_update(update: &TicketUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(title) = &update.title {
        TITLE_RULE.check(title, &mut errors);
    }
    if let Some(description) = &update.description {
        DESCRIPTION_RULE.check(description, &mut errors);
    }
    if let Some(reporter) = &update.reporter {
        REPORTER_RULE.check(reporter, &mut errors);
    }
    errors.into_result(|| ())
}
