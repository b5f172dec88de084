//! Account rules: signup and login form validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::forms::FormData;

/// Minimum password length in Unicode code points.
pub const PASSWORD_MIN_CHARS: usize = 10;

/// Pattern recommended by the W3C for `<input type="email">` validation.
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

pub static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

/// Shown for any failed login, whether the email or the password was wrong.
pub const MSG_INVALID_CREDENTIALS: &str = "Email or password is incorrect";

/// Shown when signup hits the unique email constraint.
pub const MSG_DUPLICATE_EMAIL: &str = "Address is already in use";

pub fn validate_signup_form(form: &mut FormData) {
    form.required(&["name", "email", "password"]);
    form.no_nul(&["name", "email", "password"]);
    form.matches_pattern("email", &EMAIL_RE);
    form.min_chars("password", PASSWORD_MIN_CHARS);
}

pub fn validate_login_form(form: &mut FormData) {
    form.required(&["email", "password"]);
    form.no_nul(&["email", "password"]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(name: &str, email: &str, password: &str) -> FormData {
        let mut form = FormData::new([("name", name), ("email", email), ("password", password)]);
        validate_signup_form(&mut form);
        form
    }

    #[test]
    fn valid_signup_passes() {
        assert!(signup("Name", "a@b.com", "longenough1").is_valid());
    }

    #[test]
    fn nine_char_password_is_too_short() {
        let form = signup("Name", "a@b.com", "shortpass");
        assert_eq!(
            form.errors.get("password"),
            Some("This field is too short (minimum is 10 characters)")
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in ["plainaddress", "a@", "@b.com", "a b@c.com", "a@-b.com"] {
            let form = signup("Name", email, "longenough1");
            assert!(form.errors.get("email").is_some(), "{email} should be rejected");
        }
    }

    #[test]
    fn accepted_email_shapes() {
        for email in ["a@b.com", "first.last+tag@sub.example.org", "x@localhost"] {
            assert!(EMAIL_RE.is_match(email), "{email} should match");
        }
    }

    #[test]
    fn nul_in_signup_name_is_rejected() {
        let form = signup("Na\0me", "a@b.com", "longenough1");
        assert_eq!(form.errors.get("name"), Some(crate::forms::MSG_NUL));
    }

    #[test]
    fn nul_in_login_email_is_rejected() {
        let mut form = FormData::new([("email", "a\0@b.com"), ("password", "whatever")]);
        validate_login_form(&mut form);
        assert_eq!(form.errors.get("email"), Some(crate::forms::MSG_NUL));
    }

    #[test]
    fn login_requires_both_fields() {
        let mut form = FormData::new([("email", "a@b.com")]);
        validate_login_form(&mut form);
        assert!(form.errors.get("password").is_some());
        assert!(form.errors.get("email").is_none());
    }
}
