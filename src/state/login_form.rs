//! Login prompt form state.
//!
//! DESIGN
//! ======
//! Validation runs on blur only and fills a per-field message slot. It does
//! not gate submission: an outstanding message never blocks `begin_submit`.
//! The busy flag is the only submit guard, and it is cleared whether the
//! login call succeeded or failed.

#[cfg(test)]
#[path = "login_form_test.rs"]
mod login_form_test;

use crate::net::types::Credentials;

pub const SUBMIT_LABEL: &str = "Login";
pub const SUBMIT_BUSY_LABEL: &str = "Logging in...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
}

impl Field {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
        }
    }

    fn invalid_message(self) -> String {
        format!("Please enter a valid {}", self.name())
    }
}

/// Validation message slots, empty when the field is fine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub email: String,
    pub password: String,
}

impl FieldErrors {
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::Password => &self.password,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    email: String,
    password: String,
    errors: FieldErrors,
    busy: bool,
}

impl LoginForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a field's value. Does not validate.
    pub fn input(&mut self, field: Field, value: impl Into<String>) {
        match field {
            Field::Email => self.email = value.into(),
            Field::Password => self.password = value.into(),
        }
    }

    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::Password => &self.password,
        }
    }

    /// Focus left `field`: set or clear its validation message.
    pub fn blur(&mut self, field: Field) {
        let message = if self.value(field).trim().is_empty() { field.invalid_message() } else { String::new() };
        *self.errors.slot(field) = message;
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// `true` while a login call is in flight.
    #[must_use]
    pub fn busy(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub fn submit_disabled(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        if self.busy { SUBMIT_BUSY_LABEL } else { SUBMIT_LABEL }
    }

    /// Mark the form busy and hand out the entered credentials.
    ///
    /// Returns `None` if a submit is already in flight.
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.busy {
            return None;
        }
        self.busy = true;
        Some(Credentials::new(self.email.clone(), self.password.clone()))
    }

    /// The login call settled, whatever its outcome.
    pub fn finish_submit(&mut self) {
        self.busy = false;
    }
}
