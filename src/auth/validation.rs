use serde::Deserialize;
use std::fmt;

use crate::auth::password::MAX_PASSWORD_BYTES;
use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Body of `POST /api/auth/login`. Missing fields deserialize as empty and
/// are reported by [`LoginRequest::validate`].
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /api/auth/register`.
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image: Option<String>,
}

pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub struct Registration {
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish_non_exhaustive()
    }
}

impl LoginRequest {
    /// Login usernames are free-form; only presence is checked.
    pub fn validate(self) -> Result<Credentials, AppError> {
        let username = self.username.trim().to_string();

        let mut problems = Vec::new();
        if username.is_empty() {
            problems.push("Username is required".to_string());
        }
        if self.password.is_empty() {
            problems.push("Password is required".to_string());
        }
        reject_if_any(problems)?;

        Ok(Credentials {
            username,
            password: self.password,
        })
    }
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, AppError> {
        let username = self.username.trim().to_string();

        let mut problems = Vec::new();
        if username.is_empty() {
            problems.push("Email is required".to_string());
        } else if !is_email_shaped(&username) {
            problems.push("Please enter a valid email".to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            problems.push(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ));
        } else if self.password.len() > MAX_PASSWORD_BYTES {
            problems.push(format!(
                "Password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            ));
        }
        reject_if_any(problems)?;

        Ok(Registration {
            username,
            password: self.password,
            first_name: non_blank(self.first_name),
            last_name: non_blank(self.last_name),
            profile_image: non_blank(self.profile_image),
        })
    }
}

fn reject_if_any(problems: Vec<String>) -> Result<(), AppError> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(problems.join("; ")))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `local@domain.tld` with no whitespace, a single `@` and a dotted domain
/// whose labels are non-empty.
pub fn is_email_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            ..Default::default()
        }
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn email_shapes() {
        assert!(is_email_shaped("a@b.com"));
        assert!(is_email_shaped("first.last+tag@mail.example.org"));
        assert!(!is_email_shaped("not-an-email"));
        assert!(!is_email_shaped("@b.com"));
        assert!(!is_email_shaped("a@b"));
        assert!(!is_email_shaped("a@.com"));
        assert!(!is_email_shaped("a@b.com."));
        assert!(!is_email_shaped("a@@b.com"));
        assert!(!is_email_shaped("a b@c.com"));
    }

    #[test]
    fn register_rejects_non_email_username() {
        let err = register("not-an-email", "123456").validate().unwrap_err();
        assert_eq!(message(err), "Please enter a valid email");
    }

    #[test]
    fn register_rejects_five_char_password() {
        let err = register("a@b.com", "12345").validate().unwrap_err();
        assert_eq!(message(err), "Password must be at least 6 characters");
    }

    #[test]
    fn register_accepts_six_char_password() {
        let reg = register("a@b.com", "123456").validate().unwrap();
        assert_eq!(reg.username, "a@b.com");
        assert_eq!(reg.password, "123456");
    }

    #[test]
    fn password_length_counts_characters_not_bytes() {
        assert!(register("a@b.com", "ééééé").validate().is_err());
        assert!(register("a@b.com", "éééééé").validate().is_ok());
    }

    #[test]
    fn register_rejects_password_over_72_bytes() {
        assert!(register("a@b.com", &"a".repeat(72)).validate().is_ok());

        let err = register("a@b.com", &format!("{}X", "a".repeat(72)))
            .validate()
            .unwrap_err();
        assert_eq!(message(err), "Password must be at most 72 bytes");

        // 36 two-byte characters fit; 37 do not.
        assert!(register("a@b.com", &"é".repeat(36)).validate().is_ok());
        assert!(register("a@b.com", &"é".repeat(37)).validate().is_err());
    }

    #[test]
    fn register_reports_every_problem_in_field_order() {
        let err = register("", "1").validate().unwrap_err();
        assert_eq!(
            message(err),
            "Email is required; Password must be at least 6 characters"
        );
    }

    #[test]
    fn register_trims_names_and_drops_blanks() {
        let reg = RegisterRequest {
            username: "  a@b.com ".to_string(),
            password: "secret1".to_string(),
            first_name: Some("  A ".to_string()),
            last_name: Some("   ".to_string()),
            profile_image: None,
        }
        .validate()
        .unwrap();
        assert_eq!(reg.username, "a@b.com");
        assert_eq!(reg.first_name.as_deref(), Some("A"));
        assert!(reg.last_name.is_none());
    }

    #[test]
    fn login_username_is_free_form() {
        let creds = LoginRequest {
            username: "just-a-handle".to_string(),
            password: "x".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(creds.username, "just-a-handle");
    }

    #[test]
    fn login_requires_both_fields() {
        let err = LoginRequest::default().validate().unwrap_err();
        assert_eq!(message(err), "Username is required; Password is required");

        let err = LoginRequest {
            username: "   ".to_string(),
            password: "secret1".to_string(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(message(err), "Username is required");
    }

    #[test]
    fn register_request_accepts_camel_case_body() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username":"a@b.com","password":"secret1","firstName":"A","lastName":"B"}"#,
        )
        .unwrap();
        assert_eq!(req.first_name.as_deref(), Some("A"));
        assert_eq!(req.last_name.as_deref(), Some("B"));
    }

    #[test]
    fn debug_output_never_contains_password() {
        let req = LoginRequest {
            username: "a@b.com".to_string(),
            password: "topsecret".to_string(),
        };
        assert!(!format!("{:?}", req).contains("topsecret"));

        let req = register("a@b.com", "topsecret");
        assert!(!format!("{:?}", req).contains("topsecret"));
    }
}
