//! Field-level format checks shared by all content records.

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::errors::FieldIssue;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .unwrap()
});

static DATETIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?Z$").unwrap()
});

/// Collects issues while a record is being checked.
#[derive(Debug, Default)]
pub struct Issues {
    list: Vec<FieldIssue>,
}

impl Issues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.list.push(FieldIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn into_vec(self) -> Vec<FieldIssue> {
        self.list
    }

    pub fn non_empty(&mut self, path: &str, value: &str) {
        self.min_chars(path, value, 1);
    }

    pub fn min_chars(&mut self, path: &str, value: &str, min: usize) {
        if value.chars().count() < min {
            if min == 1 {
                self.push(path, "Must not be empty");
            } else {
                self.push(path, format!("Must contain at least {} characters", min));
            }
        }
    }

    pub fn max_chars(&mut self, path: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.push(path, format!("Must contain at most {} characters", max));
        }
    }

    pub fn url(&mut self, path: &str, value: &str) {
        if !is_valid_url(value) {
            self.push(path, "Invalid url");
        }
    }

    pub fn email(&mut self, path: &str, value: &str) {
        if !is_valid_email(value) {
            self.push(path, "Invalid email");
        }
    }

    pub fn datetime(&mut self, path: &str, value: &str) {
        if !is_valid_datetime(value) {
            self.push(path, "Invalid datetime");
        }
    }
}

/// Absolute URL with any scheme.
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

pub fn is_valid_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL_RE.is_match(value)
}

/// ISO-8601 UTC timestamp with seconds, optional fraction and a `Z` suffix.
pub fn is_valid_datetime(value: &str) -> bool {
    DATETIME_RE.is_match(value) && DateTime::parse_from_rfc3339(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        assert!(is_valid_url("https://www.mapy.cz/s/abc"));
        assert!(is_valid_url("http://localhost:8080/cam.jpg"));
        assert!(!is_valid_url("not-a-url"));
        assert!(!is_valid_url("/relative/path"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_emails() {
        assert!(is_valid_email("vlek@skidracek.cz"));
        assert!(is_valid_email("jan.novak+ski@mail.example.com"));
        assert!(!is_valid_email("no-at-sign.cz"));
        assert!(!is_valid_email(".lead@example.com"));
        assert!(!is_valid_email("double..dot@example.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user@example.c"));
    }

    #[test]
    fn test_datetimes() {
        assert!(is_valid_datetime("2025-01-15T08:30:00Z"));
        assert!(is_valid_datetime("2025-01-15T08:30:00.123Z"));
        assert!(!is_valid_datetime("2025-01-15T08:30:00+01:00"));
        assert!(!is_valid_datetime("2025-01-15"));
        assert!(!is_valid_datetime("2025-13-15T08:30:00Z"));
        assert!(!is_valid_datetime("yesterday"));
    }

    #[test]
    fn test_char_limits_count_characters() {
        let mut issues = Issues::new();
        issues.max_chars("text", &"ž".repeat(300), 300);
        issues.min_chars("phone", "12", 3);
        issues.non_empty("title", "");

        let issues = issues.into_vec();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].path, "phone");
        assert_eq!(issues[0].message, "Must contain at least 3 characters");
        assert_eq!(issues[1].message, "Must not be empty");
    }
}
