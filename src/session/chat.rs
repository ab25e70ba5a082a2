use std::borrow::Cow;

/// Escape chat text for safe display in an HTML client.
///
/// Markup and quote characters become entities; everything else, line
/// breaks included, passes through.
pub fn escape_html(input: &str) -> Cow<'_, str> {
    html_escape::encode_safe(input)
}
