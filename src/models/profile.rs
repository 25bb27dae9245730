//! Connection Profile Model
//!
//! The set of parameters used to open a session against a device: a display
//! name, the device address and the login credentials.
//!
//! ## Security Note
//!
//! The password lives in a [`Zeroizing`] buffer that is wiped on drop. It is
//! never rendered by `Debug`, never returned by [`ConnectionProfile::describe`]
//! and never part of any error message. Only [`ConnectionProfile::password`]
//! exposes it, for the transport to authenticate with.

use std::fmt;
use std::net::IpAddr;

use once_cell::sync::Lazy;
use regex::Regex;
use zeroize::Zeroizing;

/// Displayed in place of a password that has been set
pub const PASSWORD_MASK: &str = "********";

/// Displayed in place of a password that has not been set
const PASSWORD_UNSET: &str = "(not set)";

/// Longest hostname accepted (RFC 1123, without trailing dot)
const MAX_HOSTNAME_LEN: usize = 253;

static HOSTNAME_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$")
        .expect("hostname label pattern is valid")
});

/// Editable profile field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    Host,
    Username,
    Password,
}

impl ProfileField {
    /// All fields, in display order
    pub const ALL: [ProfileField; 4] = [
        ProfileField::Name,
        ProfileField::Host,
        ProfileField::Username,
        ProfileField::Password,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::Name => "Name",
            ProfileField::Host => "Host",
            ProfileField::Username => "Username",
            ProfileField::Password => "Password",
        }
    }

    /// Whether the field's value must never be displayed
    pub fn is_secret(&self) -> bool {
        matches!(self, ProfileField::Password)
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Profile validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile is incomplete: {field} must not be empty")]
    IncompleteProfile { field: ProfileField },

    #[error("Invalid host '{host}': expected an IP address or hostname")]
    InvalidHost { host: String },
}

/// Connection parameters for one device
#[derive(Clone)]
pub struct ConnectionProfile {
    name: String,
    host: String,
    username: String,
    password: Zeroizing<String>,
}

impl ConnectionProfile {
    /// Create a profile from explicit values
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Placeholder profile shown when the console starts
    ///
    /// The password is left blank so the profile cannot be submitted
    /// until the operator types one in.
    pub fn placeholder() -> Self {
        Self::new("some connection", "1.1.1.1", "some_username", "")
    }

    /// Overwrite a field. No validation happens here.
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProfileField::Name => self.name = value,
            ProfileField::Host => self.host = value,
            ProfileField::Username => self.username = value,
            ProfileField::Password => self.password = Zeroizing::new(value),
        }
    }

    /// Read a field for display; the password comes back masked
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Name => &self.name,
            ProfileField::Host => &self.host,
            ProfileField::Username => &self.username,
            ProfileField::Password => self.masked_password(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Clear-text password, for authentication only
    pub fn password(&self) -> &str {
        &self.password
    }

    fn is_empty(&self, field: ProfileField) -> bool {
        match field {
            ProfileField::Name => self.name.is_empty(),
            ProfileField::Host => self.host.is_empty(),
            ProfileField::Username => self.username.is_empty(),
            ProfileField::Password => self.password.is_empty(),
        }
    }

    fn masked_password(&self) -> &'static str {
        if self.password.is_empty() {
            PASSWORD_UNSET
        } else {
            PASSWORD_MASK
        }
    }

    /// Check the profile can be used for a connection attempt
    ///
    /// Reports the first empty field in display order, then checks that the
    /// host is an IP address or a hostname.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if let Some(field) = ProfileField::ALL.into_iter().find(|f| self.is_empty(*f)) {
            return Err(ProfileError::IncompleteProfile { field });
        }

        if !is_valid_host(&self.host) {
            return Err(ProfileError::InvalidHost {
                host: self.host.clone(),
            });
        }

        Ok(())
    }

    /// Label/value pairs for read-only display, password masked
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        ProfileField::ALL
            .into_iter()
            .map(|field| (field.label(), self.get(field).to_string()))
            .collect()
    }
}

impl Default for ConnectionProfile {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl fmt::Debug for ConnectionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionProfile")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.masked_password())
            .finish()
    }
}

/// Whether `host` is an IPv4/IPv6 address or an RFC 1123 hostname
pub fn is_valid_host(host: &str) -> bool {
    let trimmed = host.trim_start_matches('[').trim_end_matches(']');
    if trimmed.parse::<IpAddr>().is_ok() {
        return true;
    }

    let name = host.strip_suffix('.').unwrap_or(host);
    if name.is_empty() || name.len() > MAX_HOSTNAME_LEN {
        return false;
    }

    // All-numeric dotted names must be real IPv4 addresses
    if name.split('.').all(|label| label.chars().all(|c| c.is_ascii_digit())) {
        return false;
    }

    name.split('.').all(|label| HOSTNAME_LABEL.is_match(label))
}
