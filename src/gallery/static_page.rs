use crate::gallery::document::ViewerDocument;
use crate::gallery::escape_html;
use std::fmt::Write as _;

// ============================================================================
// STATIC GALLERY (precomputed-image strategy)
// ============================================================================

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Molecule Structure Viewer</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
            background-color: #f5f5f5;
        }
        .molecule-container {
            display: flex;
            flex-wrap: wrap;
            gap: 20px;
            justify-content: center;
        }
        .molecule-card {
            background: white;
            padding: 15px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
            width: 450px;
            text-align: center;
        }
        .molecule-name {
            font-size: 18px;
            margin-bottom: 10px;
            color: #333;
        }
        img { max-width: 400px; height: auto; }
        h1 { text-align: center; color: #2c3e50; margin-bottom: 30px; }
    </style>
</head>
<body>
    <h1>Molecule Structure Viewer</h1>
    <div class="molecule-container">
"#;

const PAGE_TAIL: &str = r#"    </div>
</body>
</html>
"#;

/// Renders the static card-grid gallery: one card per entry with the
/// molecule's name and its embedded vector image. Cheap to view,
/// expensive to produce, no client-side logic.
pub fn render(document: &ViewerDocument) -> String {
    let mut html = String::from(PAGE_HEAD);

    for entry in document.entries() {
        let name = escape_html(&entry.name);
        let _ = writeln!(html, "        <div class=\"molecule-card\">");
        let _ = writeln!(html, "            <div class=\"molecule-name\">{}</div>", name);
        if let Some(uri) = entry.payload.image_uri() {
            let _ = writeln!(
                html,
                "            <img src=\"{}\" alt=\"{} structure\">",
                uri, name
            );
        }
        let _ = writeln!(html, "        </div>");
    }

    html.push_str(PAGE_TAIL);
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::document::{EntryPayload, ViewerDocument};
    use crate::render::svg::Depiction;

    fn image_doc(names: &[&str]) -> ViewerDocument {
        ViewerDocument::assemble(names.iter().map(|n| {
            (
                n.to_string(),
                EntryPayload::Image(Depiction {
                    svg: format!("<svg><title>{n}</title></svg>"),
                }),
            )
        }))
    }

    #[test]
    fn one_card_per_entry_in_order() {
        let html = render(&image_doc(&["water", "benzene"]));
        assert_eq!(html.matches("molecule-card").count(), 3); // 1 CSS rule + 2 cards
        let water = html.find(">water<").unwrap();
        let benzene = html.find(">benzene<").unwrap();
        assert!(water < benzene);
        assert_eq!(html.matches("data:image/svg+xml;base64,").count(), 2);
    }

    #[test]
    fn names_are_html_escaped() {
        let html = render(&image_doc(&["a<b>"]));
        assert!(html.contains("a&lt;b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn empty_document_still_renders_a_page() {
        let html = render(&ViewerDocument::assemble(Vec::new()));
        assert!(html.contains("<h1>"));
        assert!(!html.contains("molecule-card\">"));
    }
}
