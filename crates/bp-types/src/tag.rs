//! Tag and application name validation.
//!
//! Valid tags:
//! - Must be non-empty and at most [`MAX_NAME_LEN`] bytes
//! - Must consist of ASCII letters, digits, `_`, `-` and `.`
//! - Must not start with `-` or `.`
//!
//! Application names follow the same rules.

use crate::error::TypeError;

/// Maximum length of a tag or application name.
pub const MAX_NAME_LEN: usize = 128;

fn check_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("must not be empty".into());
    }
    if name.len() > MAX_NAME_LEN {
        return Err(format!("longer than {MAX_NAME_LEN} bytes"));
    }
    if let Some(ch) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(format!("contains forbidden character: {ch:?}"));
    }
    if name.starts_with('-') || name.starts_with('.') {
        return Err("must not start with '-' or '.'".into());
    }
    Ok(())
}

/// Validate a blueprint tag.
///
/// # Examples
///
/// ```
/// use bp_types::validate_tag;
///
/// assert!(validate_tag("image").is_ok());
/// assert!(validate_tag("q_1").is_ok());
/// assert!(validate_tag("").is_err());
/// assert!(validate_tag("bad tag").is_err());
/// ```
pub fn validate_tag(tag: &str) -> Result<(), TypeError> {
    check_name(tag).map_err(|reason| TypeError::InvalidTag {
        tag: tag.to_string(),
        reason,
    })
}

/// Validate a deployed application name.
pub fn validate_app_name(name: &str) -> Result<(), TypeError> {
    check_name(name).map_err(|reason| TypeError::InvalidAppName {
        name: name.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_tags() {
        for tag in ["image", "q_1", "_object", "my-queue", "fn.v2", "A9"] {
            assert!(validate_tag(tag).is_ok(), "{tag} should be valid");
        }
    }

    #[test]
    fn empty_tag_rejected() {
        let err = validate_tag("").unwrap_err();
        assert!(matches!(err, TypeError::InvalidTag { .. }));
    }

    #[test]
    fn forbidden_characters_rejected() {
        for tag in ["a b", "a/b", "a:b", "tab\there", "ü"] {
            assert!(validate_tag(tag).is_err(), "{tag:?} should be invalid");
        }
    }

    #[test]
    fn leading_punctuation_rejected() {
        assert!(validate_tag("-x").is_err());
        assert!(validate_tag(".x").is_err());
    }

    #[test]
    fn long_names_rejected() {
        let name = "a".repeat(MAX_NAME_LEN + 1);
        assert!(validate_app_name(&name).is_err());
        assert!(validate_app_name(&"a".repeat(MAX_NAME_LEN)).is_ok());
    }
}
