/**
 * User Input Rules
 *
 * Normalisation and validation of registration/login input, and password
 * hashing. Persistence goes through `backend::store`.
 */

use crate::shared::auth::RegisterRequest;
use crate::shared::SharedError;

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Registration input after trimming and lowercasing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub username: String,
}

/// Emails are compared trimmed and lowercase
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `local@domain.tld` with no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// `[a-zA-Z0-9_-]+`
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Check a registration request and normalise its fields
pub fn validate_registration(request: &RegisterRequest) -> Result<Registration, SharedError> {
    let email = normalize_email(&request.email);
    let name = request.name.trim().to_string();
    let username = request.username.trim().to_string();

    if email.is_empty() || request.password.is_empty() || name.is_empty() || username.is_empty() {
        return Err(SharedError::validation(
            "form",
            "All fields (email, password, name, username) are required",
        ));
    }
    if !is_valid_email(&email) {
        return Err(SharedError::validation("email", "Invalid email format"));
    }
    if !is_valid_username(&username) {
        return Err(SharedError::validation(
            "username",
            "Username can only contain letters, numbers, underscores and hyphens",
        ));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SharedError::validation(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
        ));
    }

    Ok(Registration {
        email,
        password: request.password.clone(),
        name,
        username: username.to_lowercase(),
    })
}

/// Hash a password with bcrypt at `cost`
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Compare a password against a stored bcrypt hash
///
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    bcrypt::verify(password, password_hash).unwrap_or_else(|e| {
        tracing::error!("Failed to verify password hash: {:?}", e);
        false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str, name: &str, username: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            username: username.to_string(),
        }
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("a@.com"));
    }

    #[test]
    fn test_username_format() {
        assert!(is_valid_username("a_b"));
        assert!(is_valid_username("Dash-User9"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("dot.name"));
    }

    #[test]
    fn test_registration_is_normalised() {
        let registration =
            validate_registration(&request("  A@B.Com ", "secret1", " A ", "Mixed_Case")).unwrap();
        assert_eq!(registration.email, "a@b.com");
        assert_eq!(registration.name, "A");
        assert_eq!(registration.username, "mixed_case");
    }

    #[test]
    fn test_registration_rejections() {
        let missing = validate_registration(&request("a@b.com", "", "A", "a_b")).unwrap_err();
        assert_eq!(missing.field(), Some("form"));

        let short = validate_registration(&request("a@b.com", "12345", "A", "a_b")).unwrap_err();
        assert_eq!(short.field(), Some("password"));

        let bad_user = validate_registration(&request("a@b.com", "secret1", "A", "a.b")).unwrap_err();
        assert_eq!(bad_user.field(), Some("username"));
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("secret1", crate::backend::server::MIN_BCRYPT_COST).unwrap();
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
        assert!(!verify_password("secret1", "not-a-hash"));
    }
}
