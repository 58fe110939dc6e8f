//! Form-boundary validation.
//!
//! All checks run before any network call so the user gets an inline
//! message instead of a backend 422. Length caps mirror what the backend
//! enforces. Display strings are user-facing.

use outreach_api::GenerateRequest;
use thiserror::Error;
use url::Url;

const MIN_PASSWORD_LEN: usize = 6;

/// Form validation error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was left empty
    #[error("{0} is required")]
    Required(&'static str),

    /// A field exceeded the backend's length cap
    #[error("{0} must be at most {1} characters")]
    TooLong(&'static str, usize),

    /// Password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Password below the minimum length
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    /// The LinkedIn URL is not a profile URL
    #[error("Please enter a valid LinkedIn profile URL")]
    InvalidLinkedinUrl,
}

/// Validate a new password and its confirmation.
///
/// Shared by signup and password reset.
pub fn validate_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Validate a message generation request.
pub fn validate_generate_request(request: &GenerateRequest) -> Result<(), ValidationError> {
    require("Name", &request.target_name, 100)?;
    require("Role", &request.target_role, 100)?;
    require("Goal", &request.goal_prompt, 1000)?;

    if request.linkedin_url.trim().is_empty() {
        return Err(ValidationError::Required("LinkedIn URL"));
    }
    validate_linkedin_url(&request.linkedin_url)?;

    optional("Company", request.company.as_deref(), 200)?;
    optional("Experiences", request.experiences.as_deref(), 2000)?;
    optional("Education", request.education.as_deref(), 1000)?;
    optional("Recent post", request.recent_post.as_deref(), 2000)?;
    optional("Other notes", request.other_notes.as_deref(), 1000)?;

    Ok(())
}

fn require(name: &'static str, value: &str, max_len: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(name));
    }
    if value.chars().count() > max_len {
        return Err(ValidationError::TooLong(name, max_len));
    }
    Ok(())
}

fn optional(
    name: &'static str,
    value: Option<&str>,
    max_len: usize,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        if value.chars().count() > max_len {
            return Err(ValidationError::TooLong(name, max_len));
        }
    }
    Ok(())
}

/// A LinkedIn profile URL: http(s), host `linkedin.com` (optionally with a
/// subdomain), path under `/in/`.
fn validate_linkedin_url(raw: &str) -> Result<(), ValidationError> {
    let url = Url::parse(raw.trim()).map_err(|_| ValidationError::InvalidLinkedinUrl)?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ValidationError::InvalidLinkedinUrl);
    }

    let host = url.host_str().ok_or(ValidationError::InvalidLinkedinUrl)?;
    if host != "linkedin.com" && !host.ends_with(".linkedin.com") {
        return Err(ValidationError::InvalidLinkedinUrl);
    }

    if !url.path().starts_with("/in/") {
        return Err(ValidationError::InvalidLinkedinUrl);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> GenerateRequest {
        GenerateRequest {
            target_name: "Ada Lovelace".to_string(),
            target_role: "Engineer".to_string(),
            linkedin_url: "https://www.linkedin.com/in/ada".to_string(),
            company: Some("Analytical Engines".to_string()),
            experiences: None,
            education: None,
            recent_post: None,
            other_notes: None,
            goal_prompt: "Ask about mentorship".to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_generate_request(&valid_request()).is_ok());
    }

    #[test]
    fn test_password_too_short() {
        assert_eq!(
            validate_password("short", "short"),
            Err(ValidationError::PasswordTooShort)
        );
        assert!(validate_password("longer", "longer").is_ok());
    }

    #[test]
    fn test_password_mismatch() {
        assert_eq!(
            validate_password("password1", "password2"),
            Err(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn test_password_error_messages() {
        assert_eq!(
            ValidationError::PasswordMismatch.to_string(),
            "Passwords do not match"
        );
        assert_eq!(
            ValidationError::PasswordTooShort.to_string(),
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn test_required_fields() {
        let mut request = valid_request();
        request.target_name = "  ".to_string();
        assert_eq!(
            validate_generate_request(&request),
            Err(ValidationError::Required("Name"))
        );

        let mut request = valid_request();
        request.goal_prompt = String::new();
        assert_eq!(
            validate_generate_request(&request),
            Err(ValidationError::Required("Goal"))
        );

        let mut request = valid_request();
        request.linkedin_url = String::new();
        assert_eq!(
            validate_generate_request(&request),
            Err(ValidationError::Required("LinkedIn URL"))
        );
    }

    #[test]
    fn test_length_caps() {
        let mut request = valid_request();
        request.target_name = "x".repeat(101);
        assert_eq!(
            validate_generate_request(&request),
            Err(ValidationError::TooLong("Name", 100))
        );

        let mut request = valid_request();
        request.experiences = Some("x".repeat(2001));
        assert_eq!(
            validate_generate_request(&request),
            Err(ValidationError::TooLong("Experiences", 2000))
        );

        let mut request = valid_request();
        request.experiences = Some("x".repeat(2000));
        assert!(validate_generate_request(&request).is_ok());
    }

    #[test]
    fn test_linkedin_url_accepts_profile_urls() {
        for url in [
            "https://www.linkedin.com/in/ada",
            "https://linkedin.com/in/ada-lovelace-123",
            "http://www.linkedin.com/in/ada/",
        ] {
            let mut request = valid_request();
            request.linkedin_url = url.to_string();
            assert!(
                validate_generate_request(&request).is_ok(),
                "rejected valid profile URL {}",
                url
            );
        }
    }

    #[test]
    fn test_linkedin_url_rejects_non_profile_urls() {
        for url in [
            "https://example.com/in/ada",
            "https://www.linkedin.com/company/acme",
            "https://notlinkedin.com/in/ada",
            "ftp://linkedin.com/in/ada",
            "not a url",
        ] {
            let mut request = valid_request();
            request.linkedin_url = url.to_string();
            assert_eq!(
                validate_generate_request(&request),
                Err(ValidationError::InvalidLinkedinUrl),
                "accepted invalid URL {}",
                url
            );
        }
    }
}
