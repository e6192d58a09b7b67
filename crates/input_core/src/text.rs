//! Text helpers for single-line inputs.

use std::borrow::Cow;

/// Strip newline characters from a string (single-line inputs).
///
/// Returns a `Cow::Borrowed` when nothing needs removing.
///
/// # Examples
///
/// ```
/// use input_core::filter_single_line;
///
/// assert_eq!(filter_single_line("hello"), "hello");
/// assert_eq!(filter_single_line("a\r\nb"), "ab");
/// ```
pub fn filter_single_line(s: &str) -> Cow<'_, str> {
    if !s.contains('\n') && !s.contains('\r') {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().filter(|c| *c != '\n' && *c != '\r').collect())
}

/// The trimmed value, or `None` when only whitespace remains.
pub fn trimmed(s: &str) -> Option<&str> {
    let t = s.trim();
    (!t.is_empty()).then_some(t)
}
