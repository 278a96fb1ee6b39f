use crate::errors::InternalError;

/// bcrypt work factor for password hashes
pub const BCRYPT_COST: u32 = 12;

/// Minimum password length accepted by the strength policy
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Hash a password with bcrypt. Each call generates a fresh salt, so the
/// same input never produces the same hash twice.
pub fn hash_password(password: &str) -> Result<String, InternalError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| InternalError::Crypto(format!("password hashing failed: {e}")))
}

/// Verify a password against a stored bcrypt hash.
///
/// Mismatches and malformed hashes both return false; this never errors.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Result of the password strength policy check
#[derive(Debug, Clone)]
pub struct PasswordStrength {
    pub valid: bool,
    pub violations: Vec<String>,
}

/// Check a password against the strength policy.
///
/// Reports every violated rule, not just the first.
pub fn check_password_strength(password: &str) -> PasswordStrength {
    let mut violations = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        violations.push(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push("Password must contain at least one number".to_string());
    }
    if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        violations.push("Password must contain at least one special character".to_string());
    }

    PasswordStrength {
        valid: violations.is_empty(),
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_hash_of_same_password() {
        let hash = hash_password("Correct-Horse-7").unwrap();
        assert!(verify_password("Correct-Horse-7", &hash));
    }

    #[test]
    fn verify_rejects_different_password() {
        let hash = hash_password("Correct-Horse-7").unwrap();
        assert!(!verify_password("Wrong-Horse-7", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("Correct-Horse-7").unwrap();
        let second = hash_password("Correct-Horse-7").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn verify_returns_false_on_malformed_hash() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }

    #[test]
    fn strong_password_passes() {
        let result = check_password_strength("Str0ng&Secure!");
        assert!(result.valid);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn weak_password_reports_every_violation() {
        let result = check_password_strength("short");
        assert!(!result.valid);
        // Too short, no uppercase, no digit, no symbol
        assert_eq!(result.violations.len(), 4);
    }

    #[test]
    fn long_password_without_classes_reports_missing_classes_only() {
        let result = check_password_strength("alllowercaseletters");
        assert!(!result.valid);
        assert_eq!(result.violations.len(), 3);
    }
}
