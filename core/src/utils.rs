//! Utility functions and types.

use std::fmt::Debug;

/// Redacts a secret for `Debug` output.
///
/// - Absent or empty secrets print as `EMPTY`, which keeps the `unsafe` mode visible in logs.
/// - Secrets shorter than 12 characters are fully masked.
/// - Longer secrets keep their first and last three characters so two keys can be told apart.
pub struct Redact<'a>(Option<&'a str>);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(Some(value))
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(Some(value.as_str()))
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let v = self.0.unwrap_or_default();
        let length = v.len();
        if length == 0 {
            f.write_str("EMPTY")
        } else if length < 12 || !v.is_char_boundary(3) || !v.is_char_boundary(length - 3) {
            f.write_str("***")
        } else {
            write!(f, "{}***{}", &v[..3], &v[length - 3..])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact() {
        let cases = vec![
            ("key", "***"),
            ("my-secret-key", "my-***key"),
            ("test-secret-key", "tes***key"),
            ("", "EMPTY"),
            ("0123456789a", "***"),
        ];

        for (input, expected) in cases {
            assert_eq!(
                format!("{:?}", Redact::from(input)),
                expected,
                "Failed on input: {}",
                input
            );
        }
    }

    #[test]
    fn test_redact_option() {
        assert_eq!(format!("{:?}", Redact::from(&None::<String>)), "EMPTY");
        assert_eq!(
            format!("{:?}", Redact::from(&Some("my-secret-key".to_string()))),
            "my-***key"
        );
    }
}
