use super::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a client
pub type ClientId = Uuid;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_!#$%&'*+/=?`{|}~^.-]+@[a-zA-Z0-9.-]+$").expect("valid email regex")
});

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[(]?[0-9]{3}[)]?[-\s.]?[0-9]{3}[-\s.]?[0-9]{4,6}$")
        .expect("valid phone regex")
});

static TIMEZONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+](0[0-9]|1[0-4]):[0-5][0-9]$").expect("valid timezone regex")
});

/// A customer that projects can be billed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Client {
    id: ClientId,
    company: String,
    name: String,
    email: String,
    phone_number: String,
    /// UTC offset such as `+02:00`.
    timezone: String,
}

impl Client {
    /// Creates a client with a freshly generated id.
    pub fn new(
        company: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), company, name, email, phone_number, timezone)
    }

    /// Rebuilds a client with a known id, re-validating every field.
    pub fn with_id(
        id: ClientId,
        company: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let mut client = Self {
            id,
            company: company.into(),
            name: name.into(),
            email: String::new(),
            phone_number: String::new(),
            timezone: String::new(),
        };
        client.set_email(email)?;
        client.set_phone_number(phone_number)?;
        client.set_timezone(timezone)?;
        Ok(client)
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn set_company(&mut self, company: impl Into<String>) {
        self.company = company.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), ValidationError> {
        let email = email.into();
        if !EMAIL_PATTERN.is_match(&email) {
            return Err(ValidationError::Email(email));
        }
        self.email = email;
        Ok(())
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn set_phone_number(
        &mut self,
        phone_number: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let phone_number = phone_number.into();
        if !PHONE_PATTERN.is_match(&phone_number) {
            return Err(ValidationError::PhoneNumber(phone_number));
        }
        self.phone_number = phone_number;
        Ok(())
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn set_timezone(&mut self, timezone: impl Into<String>) -> Result<(), ValidationError> {
        let timezone = timezone.into();
        if !TIMEZONE_PATTERN.is_match(&timezone) {
            return Err(ValidationError::Timezone(timezone));
        }
        self.timezone = timezone;
        Ok(())
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} ({}) <{}> {} UTC{}",
            self.id, self.company, self.name, self.email, self.phone_number, self.timezone
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> Client {
        Client::new(
            "XYZ Ltd",
            "Jane Smith",
            "jane.smith@xyzltd.com",
            "0612345678",
            "+02:00",
        )
        .expect("valid client")
    }

    #[test]
    fn test_client_accepts_valid_fields() {
        let client = jane();
        assert_eq!(client.company(), "XYZ Ltd");
        assert_eq!(client.timezone(), "+02:00");
        assert!(Client::new("ABC Corp", "John Doe", "john@abc.com", "+1234567890", "-03:30").is_ok());
        assert!(Client::new("ABC Corp", "John Doe", "john@abc.com", "(123) 456-7890", "+00:00").is_ok());
    }

    #[test]
    fn test_client_rejects_bad_email() {
        let err = Client::new("XYZ", "Jane", "jane.xyzltd.com", "0612345678", "+02:00")
            .expect_err("missing @ must be rejected");
        assert_eq!(err, ValidationError::Email("jane.xyzltd.com".into()));
    }

    #[test]
    fn test_client_rejects_bad_phone_and_timezone() {
        assert!(matches!(
            Client::new("XYZ", "Jane", "jane@xyz.com", "12-34", "+02:00"),
            Err(ValidationError::PhoneNumber(_))
        ));
        assert!(matches!(
            Client::new("XYZ", "Jane", "jane@xyz.com", "0612345678", "Europe/Paris"),
            Err(ValidationError::Timezone(_))
        ));
        assert!(matches!(
            Client::new("XYZ", "Jane", "jane@xyz.com", "0612345678", "+2:00"),
            Err(ValidationError::Timezone(_))
        ));
    }

    #[test]
    fn test_failed_setter_leaves_value_untouched() {
        let mut client = jane();
        assert!(client.set_email("broken").is_err());
        assert_eq!(client.email(), "jane.smith@xyzltd.com");
        assert!(client.set_timezone("+25:00").is_err());
        assert_eq!(client.timezone(), "+02:00");
    }
}
