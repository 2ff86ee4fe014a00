//! Tag type name validation.
//!
//! Valid names:
//! - Lowercase ASCII letters, digits, underscores (`_`), and hyphens (`-`)
//! - Must start with a letter
//! - Cannot have consecutive hyphens (`--`)
//! - Cannot end with a hyphen

/// Validates a tag type name before it is registered.
///
/// # Examples
/// ```
/// use annotagapp::tags::validation::validate_tag_name;
///
/// assert!(validate_tag_name("treeselect").is_ok());
/// assert!(validate_tag_name("video-2").is_ok());
/// assert!(validate_tag_name("rect_label").is_ok());
///
/// assert!(validate_tag_name("").is_err());
/// assert!(validate_tag_name("TreeSelect").is_err());
/// assert!(validate_tag_name("-video").is_err());
/// assert!(validate_tag_name("video-").is_err());
/// assert!(validate_tag_name("tree--select").is_err());
/// assert!(validate_tag_name("3d").is_err());
/// ```
pub fn validate_tag_name(name: &str) -> Result<(), TagNameError> {
    let Some(first) = name.chars().next() else {
        return Err(TagNameError::Empty);
    };
    if !first.is_ascii_alphabetic() {
        return Err(TagNameError::InvalidStart(first));
    }
    if name.ends_with('-') {
        return Err(TagNameError::EndsWithHyphen);
    }

    let mut prev_was_hyphen = false;
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            return Err(TagNameError::Uppercase(ch));
        }
        if !is_valid_name_char(ch) {
            return Err(TagNameError::InvalidCharacter(ch));
        }
        if ch == '-' && prev_was_hyphen {
            return Err(TagNameError::ConsecutiveHyphens);
        }
        prev_was_hyphen = ch == '-';
    }

    Ok(())
}

fn is_valid_name_char(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' || ch == '-'
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagNameError {
    Empty,
    /// Must start with a letter
    InvalidStart(char),
    EndsWithHyphen,
    ConsecutiveHyphens,
    /// Names are stored lowercase so lookups can ignore case
    Uppercase(char),
    InvalidCharacter(char),
}

impl std::fmt::Display for TagNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagNameError::Empty => write!(f, "tag name cannot be empty"),
            TagNameError::InvalidStart(ch) => {
                write!(f, "tag name must start with a letter, found '{}'", ch)
            }
            TagNameError::EndsWithHyphen => write!(f, "tag name cannot end with a hyphen"),
            TagNameError::ConsecutiveHyphens => {
                write!(f, "tag name cannot contain consecutive hyphens")
            }
            TagNameError::Uppercase(ch) => {
                write!(f, "tag name must be lowercase, found '{}'", ch)
            }
            TagNameError::InvalidCharacter(ch) => write!(
                f,
                "tag name contains invalid character '{}' (only letters, digits, underscore, and hyphen allowed)",
                ch
            ),
        }
    }
}

impl std::error::Error for TagNameError {}
