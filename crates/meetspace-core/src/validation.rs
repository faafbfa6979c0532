//! Form rules of the entry and detail steps

use std::sync::LazyLock;

use regex::Regex;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::registration::{Password, EVENT_FORMATS};

/// Longest accepted "about" text, in characters.
pub const ABOUT_MAX_LENGTH: usize = 400;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[a-zA-Z0-9.-]+$").expect("email pattern compiles")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value.trim())
}

fn validate_email_pattern(value: &str) -> Result<(), ValidationError> {
    if is_valid_email(value) {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("Enter a valid email".into()))
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("Must not be blank".into()))
    } else {
        Ok(())
    }
}

/// Entry step of both registration flows
#[derive(Clone, Validate)]
pub struct SignupForm {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_email_pattern"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl std::fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl SignupForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Validate and trim name and email.
    pub fn checked(self) -> AppResult<Self> {
        self.validate()?;
        Ok(Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        })
    }

    pub fn password(&self) -> Password {
        Password::new(self.password.clone())
    }
}

/// Login form
#[derive(Clone, Validate)]
pub struct LoginForm {
    #[validate(custom(function = "validate_email_pattern"))]
    pub email: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Validate and trim the email.
    pub fn checked(self) -> AppResult<Self> {
        self.validate()?;
        Ok(Self {
            email: self.email.trim().to_string(),
            password: self.password,
        })
    }
}

/// Non-blank description of at most [`ABOUT_MAX_LENGTH`] characters.
pub fn validate_about(about: &str) -> AppResult<()> {
    let about = about.trim();
    if about.is_empty() {
        return Err(AppError::InvalidInput("Description is required".to_string()));
    }
    let length = about.chars().count();
    if length > ABOUT_MAX_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Description must be at most {} characters, got {}",
            ABOUT_MAX_LENGTH, length
        )));
    }
    Ok(())
}

/// At least one contact channel is filled in.
pub fn has_contact(phone: &str, work_email: &str, telegram: &str) -> bool {
    [phone, work_email, telegram]
        .iter()
        .any(|value| !value.trim().is_empty())
}

fn validate_contacts(phone: &str, work_email: &str, telegram: &str) -> AppResult<()> {
    if !has_contact(phone, work_email, telegram) {
        return Err(AppError::InvalidInput(
            "Provide at least one contact: phone, work email or telegram".to_string(),
        ));
    }
    if !work_email.trim().is_empty() && !is_valid_email(work_email) {
        return Err(AppError::InvalidInput("Work email is not valid".to_string()));
    }
    Ok(())
}

/// Every format is one of [`EVENT_FORMATS`].
pub fn validate_event_formats(formats: &[String]) -> AppResult<()> {
    let unknown: Vec<&str> = formats
        .iter()
        .map(String::as_str)
        .filter(|f| !EVENT_FORMATS.contains(f))
        .collect();
    if !unknown.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "Unknown event formats: {:?}",
            unknown
        )));
    }
    Ok(())
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Profile step of the creator flow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDetails {
    pub description: String,
    pub city: String,
    pub phone: String,
    pub work_email: String,
    pub telegram_personal: String,
}

impl ProfileDetails {
    pub fn validate(&self) -> AppResult<()> {
        validate_about(&self.description)?;
        validate_contacts(&self.phone, &self.work_email, &self.telegram_personal)
    }

    pub fn phone(&self) -> Option<String> {
        optional(&self.phone)
    }

    pub fn work_email(&self) -> Option<String> {
        optional(&self.work_email)
    }

    pub fn telegram_personal(&self) -> Option<String> {
        optional(&self.telegram_personal)
    }
}

/// Profile step of the venue flow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueDetails {
    pub description: String,
    pub city: String,
    pub street: String,
    pub phone: String,
    pub work_email: String,
    pub telegram_personal: String,
    pub event_formats: Vec<String>,
}

impl VenueDetails {
    pub fn validate(&self) -> AppResult<()> {
        validate_about(&self.description)?;
        if self.street.trim().is_empty() {
            return Err(AppError::InvalidInput("Street address is required".to_string()));
        }
        validate_event_formats(&self.event_formats)?;
        validate_contacts(&self.phone, &self.work_email, &self.telegram_personal)
    }

    pub fn phone(&self) -> Option<String> {
        optional(&self.phone)
    }

    pub fn work_email(&self) -> Option<String> {
        optional(&self.work_email)
    }

    pub fn telegram_personal(&self) -> Option<String> {
        optional(&self.telegram_personal)
    }
}
