//! Registration form state.
//!
//! Fields are validated as they change. An empty field is never reported as
//! invalid, it only keeps the form from being submitted. Conflicts reported
//! by the server (login or email already used) are merged back into the
//! field errors.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

pub const MIN_LOGIN_LEN: usize = 5;
pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^(?:"[\w\s-]+"[\w-]+(?:\.[\w-]+)*|"[\w\s-]+"|[\w-]+(?:\.[\w-]+)*)@(?:(?:[\w-]+\.)*\w[\w-]{0,66}\.[a-z]{2,6}(?:\.[a-z]{2})?|\[?(?:(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[0-9]{1,2})\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[0-9]{1,2})\]?)$"#,
    )
    .expect("email pattern is valid")
});

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoginError {
    #[error("Minimum 5 characters")]
    TooShort,
    #[error("Login already taken")]
    Taken,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EmailError {
    #[error("Invalid email format")]
    InvalidFormat,
    #[error("Email already taken")]
    Taken,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("All fields are required")]
    Incomplete,
    #[error("Form has invalid fields")]
    Invalid,
}

/// Body of the registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub login: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrationErrors {
    pub login: Option<LoginError>,
    pub email: Option<EmailError>,
    pub password_too_short: bool,
    pub passwords_differ: bool,
}

impl RegistrationErrors {
    pub fn any(&self) -> bool {
        self.login.is_some() || self.email.is_some() || self.password_too_short || self.passwords_differ
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    login: String,
    email: String,
    password: String,
    repeated_password: String,
    errors: RegistrationErrors,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_login(&mut self, login: impl Into<String>) {
        self.login = login.into();
        let len = self.login.chars().count();
        self.errors.login = (len != 0 && len < MIN_LOGIN_LEN).then_some(LoginError::TooShort);
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.errors.email =
            (!self.email.is_empty() && !is_valid_email(&self.email)).then_some(EmailError::InvalidFormat);
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
        let len = self.password.chars().count();
        self.errors.password_too_short = len != 0 && len < MIN_PASSWORD_LEN;
        self.check_repeated();
    }

    pub fn set_repeated_password(&mut self, repeated: impl Into<String>) {
        self.repeated_password = repeated.into();
        self.check_repeated();
    }

    fn check_repeated(&mut self) {
        self.errors.passwords_differ =
            !self.repeated_password.is_empty() && self.repeated_password != self.password;
    }

    /// Merge a rejected registration response. The server names the
    /// conflicting fields as keys of the body.
    pub fn apply_server_rejection(&mut self, body: &serde_json::Value) {
        let Some(fields) = body.as_object() else {
            tracing::warn!(%body, "Unexpected registration rejection body");
            return;
        };
        if fields.contains_key("email") {
            self.errors.email = Some(EmailError::Taken);
        }
        if fields.contains_key("username") {
            self.errors.login = Some(LoginError::Taken);
        }
    }

    pub fn is_filled(&self) -> bool {
        !self.login.is_empty()
            && !self.email.is_empty()
            && !self.password.is_empty()
            && !self.repeated_password.is_empty()
    }

    pub fn can_submit(&self) -> bool {
        self.is_filled() && !self.errors.any()
    }

    pub fn to_request(&self) -> Result<RegisterRequest, RegistrationError> {
        if !self.is_filled() {
            return Err(RegistrationError::Incomplete);
        }
        if self.errors.any() {
            return Err(RegistrationError::Invalid);
        }
        Ok(RegisterRequest {
            login: self.login.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }

    pub fn errors(&self) -> &RegistrationErrors {
        &self.errors
    }

    /// The login hint is shown even when there is no error.
    pub fn login_helper_text(&self) -> String {
        self.errors
            .login
            .unwrap_or(LoginError::TooShort)
            .to_string()
    }

    pub fn email_helper_text(&self) -> String {
        self.errors.email.map(|e| e.to_string()).unwrap_or_default()
    }
}
