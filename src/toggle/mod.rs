//! Wrap/unwrap toggling of inline markup.
//!
//! The engine is stateless: whether content is already wrapped is derived
//! from the text on every call, so the same entry point both adds and
//! removes a marker pair.
//!
//! Detection is a heuristic, not a parser. The opening marker is the
//! *first* occurrence of the identifying substring and the closing marker
//! is the *last* occurrence of the postfix, so the widest possible span is
//! treated as wrapped. Escaped and nested markers are not understood.

mod apply;

pub use apply::{
    EditResult, EditTarget, apply_to_edit_target, read_edit_target, toggle_in_editor,
};

use std::fmt;

use thiserror::Error;

/// Which half of a marker pair an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerPart {
    Prefix,
    Postfix,
    IdentifyingSubstring,
}

impl fmt::Display for MarkerPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Prefix => "prefix",
            Self::Postfix => "postfix",
            Self::IdentifyingSubstring => "identifying substring",
        })
    }
}

/// Errors raised while toggling content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleError {
    /// A marker string was empty.
    #[error("marker {0} must not be empty")]
    EmptyMarker(MarkerPart),

    /// Removing the markers would split a multi-byte character.
    #[error("marker at byte {index} does not fall on a character boundary")]
    MisalignedMarker { index: usize },
}

/// An opening/closing marker pair such as `("**", "**")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerPair {
    pub prefix: String,
    pub postfix: String,
}

impl MarkerPair {
    pub fn new(prefix: impl Into<String>, postfix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            postfix: postfix.into(),
        }
    }

    /// Fail if either half is empty.
    pub fn validate(&self) -> Result<(), ToggleError> {
        validate_markers(&self.prefix, &self.postfix, None)
    }
}

impl fmt::Display for MarkerPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}...{}", self.prefix, self.postfix)
    }
}

/// Byte positions of the opening and closing markers in wrapped content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WrapSpan {
    open: usize,
    close: usize,
}

fn find_wrap_span(content: &str, postfix: &str, identifying: &str) -> Option<WrapSpan> {
    let open = content.find(identifying)?;
    let close = content.rfind(postfix)?;
    (open < close).then_some(WrapSpan { open, close })
}

fn validate_markers(
    prefix: &str,
    postfix: &str,
    identifying: Option<&str>,
) -> Result<(), ToggleError> {
    if prefix.is_empty() {
        return Err(ToggleError::EmptyMarker(MarkerPart::Prefix));
    }
    if postfix.is_empty() {
        return Err(ToggleError::EmptyMarker(MarkerPart::Postfix));
    }
    if identifying.is_some_and(str::is_empty) {
        return Err(ToggleError::EmptyMarker(MarkerPart::IdentifyingSubstring));
    }
    Ok(())
}

/// Returns true if `content` is wrapped by the marker pair.
///
/// `identifying` locates the opening marker and defaults to `prefix`.
pub fn is_wrapped(content: &str, prefix: &str, postfix: &str, identifying: Option<&str>) -> bool {
    find_wrap_span(content, postfix, identifying.unwrap_or(prefix)).is_some()
}

/// Unwrap `content` if it is wrapped, otherwise wrap it.
///
/// Unwrapping removes `prefix.len()` bytes at the opening marker and
/// `postfix.len()` bytes at the closing marker, keeping everything else.
/// When `identifying` differs in length from `prefix` the removed slice is
/// still sized by `prefix`.
///
/// # Errors
///
/// Returns [`ToggleError::EmptyMarker`] if any marker is empty and
/// [`ToggleError::MisalignedMarker`] if a removal boundary would split a
/// character.
pub fn toggle(
    content: &str,
    prefix: &str,
    postfix: &str,
    identifying: Option<&str>,
) -> Result<String, ToggleError> {
    validate_markers(prefix, postfix, identifying)?;

    let Some(span) = find_wrap_span(content, postfix, identifying.unwrap_or(prefix)) else {
        tracing::debug!(%prefix, %postfix, "wrapping content");
        return Ok(format!("{prefix}{content}{postfix}"));
    };

    tracing::debug!(
        %prefix,
        %postfix,
        open = span.open,
        close = span.close,
        "unwrapping content"
    );

    let inner_start = span.open + prefix.len();
    let after_start = span.close + postfix.len();
    let slice = move |range: std::ops::Range<usize>| {
        content
            .get(range.clone())
            .ok_or(ToggleError::MisalignedMarker { index: range.start })
    };

    let before = slice(0..span.open)?;
    // An opening marker overlapping the closing one leaves nothing between them.
    let inner = if inner_start <= span.close {
        slice(inner_start..span.close)?
    } else {
        ""
    };
    let after = slice(after_start.min(content.len())..content.len())?;

    Ok([before, inner, after].concat())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_plain_content() {
        assert_eq!(toggle("hello", "**", "**", None).unwrap(), "**hello**");
    }

    #[test]
    fn test_unwrap_wrapped_content() {
        assert_eq!(toggle("**hello**", "**", "**", None).unwrap(), "hello");
    }

    #[test]
    fn test_unwrap_keeps_text_outside_markers() {
        assert_eq!(
            toggle("say ==hi== now", "==", "==", None).unwrap(),
            "say hi now"
        );
    }

    #[test]
    fn test_close_marker_uses_last_occurrence() {
        assert!(is_wrapped("==a==b==", "==", "==", None));
        assert_eq!(toggle("==a==b==", "==", "==", None).unwrap(), "a==b");
    }

    #[test]
    fn test_single_marker_is_not_wrapped() {
        assert!(!is_wrapped("==abc", "==", "==", None));
        assert_eq!(toggle("==abc", "==", "==", None).unwrap(), "====abc==");
    }

    #[test]
    fn test_postfix_before_prefix_is_not_wrapped() {
        assert!(!is_wrapped(">>x<<", "<<", ">>", None));
        assert_eq!(toggle(">>x<<", "<<", ">>", None).unwrap(), "<<>>x<<>>");
    }

    #[test]
    fn test_asymmetric_markers_unwrap() {
        assert_eq!(toggle("a <<b>> c", "<<", ">>", None).unwrap(), "a b c");
    }

    #[test]
    fn test_identifying_substring_locates_open_marker() {
        assert!(is_wrapped("<mark>x</mark>", "<mark>", "</mark>", Some("<ma")));
        assert_eq!(
            toggle("<mark>x</mark>", "<mark>", "</mark>", Some("<ma")).unwrap(),
            "x"
        );
    }

    #[test]
    fn test_identifying_substring_defaults_to_prefix() {
        assert_eq!(
            is_wrapped("_x_", "_", "_", None),
            is_wrapped("_x_", "_", "_", Some("_"))
        );
    }

    #[test]
    fn test_overlapping_markers_leave_empty_interior() {
        assert_eq!(toggle("===", "==", "==", None).unwrap(), "");
    }

    #[test]
    fn test_empty_prefix_is_rejected() {
        assert_eq!(
            toggle("content", "", "x", None),
            Err(ToggleError::EmptyMarker(MarkerPart::Prefix))
        );
    }

    #[test]
    fn test_empty_postfix_is_rejected() {
        assert_eq!(
            toggle("content", "x", "", None),
            Err(ToggleError::EmptyMarker(MarkerPart::Postfix))
        );
    }

    #[test]
    fn test_empty_identifying_substring_is_rejected() {
        assert_eq!(
            toggle("content", "x", "y", Some("")),
            Err(ToggleError::EmptyMarker(MarkerPart::IdentifyingSubstring))
        );
    }

    #[test]
    fn test_misaligned_removal_is_an_error() {
        // The identifying substring is shorter than the prefix, so the
        // removed slice ends inside 'é'.
        let result = toggle("aé]", "aX", "]", Some("a"));
        assert_eq!(result, Err(ToggleError::MisalignedMarker { index: 2 }));
    }

    #[test]
    fn test_multibyte_content_round_trips() {
        let wrapped = toggle("café", "~~", "~~", None).unwrap();
        assert_eq!(wrapped, "~~café~~");
        assert_eq!(toggle(&wrapped, "~~", "~~", None).unwrap(), "café");
    }

    #[test]
    fn test_marker_pair_display() {
        assert_eq!(MarkerPair::new("<<", ">>").to_string(), "<<...>>");
    }

    #[test]
    fn test_marker_pair_validate() {
        assert!(MarkerPair::new("=", "=").validate().is_ok());
        assert!(MarkerPair::new("", "=").validate().is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn marker() -> impl Strategy<Value = String> {
            prop::sample::select(vec!["==", "**", "_", "~~", "`", "<<", ">>", "%%"])
                .prop_map(str::to_string)
        }

        proptest! {
            #[test]
            fn wrapping_concatenates_markers(
                content in "[a-zA-Z0-9 .,é]{1,40}",
                prefix in marker(),
                postfix in marker(),
            ) {
                prop_assume!(!content.contains(&prefix) && !content.contains(&postfix));
                let wrapped = toggle(&content, &prefix, &postfix, None).unwrap();
                prop_assert_eq!(wrapped, format!("{prefix}{content}{postfix}"));
            }

            #[test]
            fn toggle_twice_restores_content(
                content in "[a-zA-Z0-9 .,é]{1,40}",
                prefix in marker(),
                postfix in marker(),
            ) {
                prop_assume!(!content.contains(&prefix) && !content.contains(&postfix));
                let wrapped = toggle(&content, &prefix, &postfix, None).unwrap();
                let restored = toggle(&wrapped, &prefix, &postfix, None).unwrap();
                prop_assert_eq!(restored, content);
            }

            #[test]
            fn toggle_never_panics(
                content in ".{0,40}",
                prefix in ".{0,3}",
                postfix in ".{0,3}",
                identifying in proptest::option::of(".{0,3}"),
            ) {
                let _ = toggle(&content, &prefix, &postfix, identifying.as_deref());
            }
        }
    }
}
