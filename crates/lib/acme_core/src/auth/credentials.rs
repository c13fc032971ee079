//! Credentials payload validation.
//!
//! The sign-in payload arrives untyped. It is accepted only when it is an
//! object carrying a syntactically valid `email` string and a `password`
//! string of at least [`MIN_PASSWORD_LEN`] UTF-16 code units, the length a
//! browser reports for the same field. Unknown keys are ignored.

use std::fmt;

use serde_json::Value;

/// Minimum password length, in UTF-16 code units.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validated sign-in credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Every schema issue found in a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialsError {
    pub issues: Vec<String>,
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.issues.join("; "))
    }
}

impl std::error::Error for CredentialsError {}

/// Validate an untyped payload into [`Credentials`].
pub fn parse_credentials(payload: &Value) -> Result<Credentials, CredentialsError> {
    let Some(fields) = payload.as_object() else {
        return Err(CredentialsError {
            issues: vec![format!("Expected object, received {}", type_name(payload))],
        });
    };

    let mut issues = Vec::new();

    let email = match string_field(fields.get("email"), "email", &mut issues) {
        Some(email) if is_valid_email(email) => Some(email),
        Some(_) => {
            issues.push("email: Invalid email".to_string());
            None
        }
        None => None,
    };

    let password = match string_field(fields.get("password"), "password", &mut issues) {
        Some(password) if password.encode_utf16().count() >= MIN_PASSWORD_LEN => Some(password),
        Some(_) => {
            issues.push(format!(
                "password: String must contain at least {MIN_PASSWORD_LEN} character(s)"
            ));
            None
        }
        None => None,
    };

    match (email, password) {
        (Some(email), Some(password)) if issues.is_empty() => Ok(Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }),
        _ => Err(CredentialsError { issues }),
    }
}

/// Check an address against the accepted email syntax.
///
/// Local part: `[A-Za-z0-9_'+-.]`, not starting with `.`, ending in
/// `[A-Za-z0-9_+-]`. Domain: one or more `label.` groups followed by an
/// alphabetic top-level label of at least two letters. `..` is rejected anywhere.
pub fn is_valid_email(address: &str) -> bool {
    if address.contains("..") {
        return false;
    }
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };

    let local_ok = !local.starts_with('.')
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '+' | '-' | '.'))
        && local
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'));
    if !local_ok {
        return false;
    }

    let Some((labels, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    labels.split('.').all(|label| {
        let mut chars = label.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

fn string_field<'a>(
    value: Option<&'a Value>,
    name: &str,
    issues: &mut Vec<String>,
) -> Option<&'a str> {
    match value {
        None | Some(Value::Null) => {
            issues.push(format!("{name}: Required"));
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            issues.push(format!(
                "{name}: Expected string, received {}",
                type_name(other)
            ));
            None
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
