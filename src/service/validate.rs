use regex::Regex;
use std::sync::LazyLock;

use crate::error::CatalogError;

/// Letters, digits, underscore and slash only. Applies to every manually
/// entered catalog code.
static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_/]+$").expect("code regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

pub fn validate_code(code: &str, max_len: usize, field: &str) -> Result<(), CatalogError> {
    if code.is_empty() || code.chars().count() > max_len || !CODE_RE.is_match(code) {
        return Err(CatalogError::Validation(field.to_string()));
    }
    Ok(())
}

pub fn validate_name(name: &str, max_len: usize, field: &str) -> Result<(), CatalogError> {
    if name.is_empty() || name.chars().count() > max_len {
        return Err(CatalogError::Validation(field.to_string()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CatalogError> {
    if !EMAIL_RE.is_match(email) {
        return Err(CatalogError::Validation("email".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_accepts_letters_digits_underscore_slash() {
        assert!(validate_code("NTS001", 6, "code").is_ok());
        assert!(validate_code("a_b/c", 6, "code").is_ok());
    }

    #[test]
    fn code_rejects_special_chars_and_overlength() {
        assert!(validate_code("NTS-01", 6, "code").is_err());
        assert!(validate_code("NTS 01", 6, "code").is_err());
        assert!(validate_code("NTS0001", 6, "code").is_err());
        assert!(validate_code("", 6, "code").is_err());
    }

    #[test]
    fn name_length_is_counted_in_chars() {
        // 50 multibyte chars must pass a 50-char limit.
        let name = "â".repeat(50);
        assert!(validate_name(&name, 50, "name").is_ok());
        let name = "â".repeat(51);
        assert!(validate_name(&name, 50, "name").is_err());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("staff@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
    }
}
