//! Runtime configuration for the Reminder Scheduling context.

use reminders_core::error::DomainError;

use crate::domain::country::Country;

/// Environment variable overriding the default country.
pub const DEFAULT_COUNTRY_ENV: &str = "REMINDERS_DEFAULT_COUNTRY";

/// Settings shared by the command handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderConfig {
    /// Country assigned to newly scheduled reminders.
    pub default_country: Country,
}

impl ReminderConfig {
    /// Builds a config whose newly scheduled reminders belong to `default_country`.
    #[must_use]
    pub fn new(default_country: Country) -> Self {
        Self { default_country }
    }

    /// Reads the config from the environment, falling back to `FR`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCountry` if the variable is set to a
    /// malformed country code.
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        match lookup(DEFAULT_COUNTRY_ENV) {
            Some(code) => Ok(Self::new(Country::new(&code)?)),
            None => Ok(Self::default()),
        }
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            default_country: Country::france(),
        }
    }
}
