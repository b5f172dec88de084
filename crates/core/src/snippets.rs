//! Snippet rules: the permitted expiry offsets and create-form validation.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::forms::FormData;

/// Maximum title length in Unicode code points.
pub const TITLE_MAX_CHARS: usize = 100;

/// Number of snippets shown on the home page.
pub const DEFAULT_RECENT_LIMIT: i64 = 10;

/// Form values accepted for the `expires` field.
pub const PERMITTED_EXPIRY_VALUES: &[&str] = &["365", "7", "1"];

/// How long a new snippet stays readable, in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryDays {
    OneDay,
    OneWeek,
    OneYear,
}

impl ExpiryDays {
    pub fn days(self) -> i32 {
        match self {
            ExpiryDays::OneDay => 1,
            ExpiryDays::OneWeek => 7,
            ExpiryDays::OneYear => 365,
        }
    }
}

impl TryFrom<i32> for ExpiryDays {
    type Error = CoreError;

    fn try_from(days: i32) -> Result<Self, Self::Error> {
        match days {
            1 => Ok(ExpiryDays::OneDay),
            7 => Ok(ExpiryDays::OneWeek),
            365 => Ok(ExpiryDays::OneYear),
            other => Err(CoreError::Validation(format!(
                "Expiry must be one of 1, 7 or 365 days, got {other}"
            ))),
        }
    }
}

impl FromStr for ExpiryDays {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days: i32 = s
            .trim()
            .parse()
            .map_err(|_| CoreError::Validation(format!("Invalid expiry value '{s}'")))?;
        Self::try_from(days)
    }
}

impl fmt::Display for ExpiryDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.days())
    }
}

/// Check a submitted create-snippet form. Messages land in `form.errors`.
pub fn validate_create_form(form: &mut FormData) {
    form.required(&["title", "content", "expires"]);
    form.no_nul(&["title", "content", "expires"]);
    form.max_chars("title", TITLE_MAX_CHARS);
    form.permitted_values("expires", PERMITTED_EXPIRY_VALUES);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_parses_permitted_values_only() {
        assert_eq!("1".parse::<ExpiryDays>().unwrap(), ExpiryDays::OneDay);
        assert_eq!("7".parse::<ExpiryDays>().unwrap(), ExpiryDays::OneWeek);
        assert_eq!("365".parse::<ExpiryDays>().unwrap(), ExpiryDays::OneYear);
        assert!("30".parse::<ExpiryDays>().is_err());
        assert!("week".parse::<ExpiryDays>().is_err());
    }

    #[test]
    fn permitted_values_all_parse() {
        for value in PERMITTED_EXPIRY_VALUES {
            assert!(value.parse::<ExpiryDays>().is_ok(), "{value} should parse");
        }
    }

    #[test]
    fn valid_create_form_passes() {
        let mut form = FormData::new([
            ("title", "O snail"),
            ("content", "Climb Mount Fuji"),
            ("expires", "7"),
        ]);
        validate_create_form(&mut form);
        assert!(form.is_valid());
    }

    #[test]
    fn title_of_101_chars_is_rejected() {
        let title = "a".repeat(101);
        let mut form = FormData::new([
            ("title", title.as_str()),
            ("content", "body"),
            ("expires", "1"),
        ]);
        validate_create_form(&mut form);
        assert!(form.errors.get("title").is_some());
        assert!(form.errors.get("content").is_none());
    }

    #[test]
    fn nul_in_content_is_rejected() {
        let mut form = FormData::new([
            ("title", "t"),
            ("content", "a\0b"),
            ("expires", "7"),
        ]);
        validate_create_form(&mut form);
        assert_eq!(form.errors.get("content"), Some(crate::forms::MSG_NUL));
    }

    #[test]
    fn unknown_expiry_is_rejected() {
        let mut form = FormData::new([
            ("title", "t"),
            ("content", "c"),
            ("expires", "30"),
        ]);
        validate_create_form(&mut form);
        assert_eq!(form.errors.get("expires"), Some(crate::forms::MSG_INVALID));
    }
}
