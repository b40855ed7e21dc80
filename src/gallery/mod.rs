pub mod document;
pub mod static_page;
pub mod viewer;

/// Minimal HTML text escaping for user-controlled molecule names.
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
