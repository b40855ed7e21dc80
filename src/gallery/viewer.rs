use crate::gallery::document::ViewerDocument;
use crate::gallery::escape_html;
use std::fmt::Write as _;

// ============================================================================
// INTERACTIVE VIEWER (raw-geometry strategy)
// ============================================================================

/// Single-page template. `__NAME_LIST__` receives the clickable name
/// entries, `__XYZ_DATA__` a JSON array of base64 XYZ payloads aligned
/// index-for-index with the name list. Rendering is one substitution
/// pass over pre-assembled document data.
const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Molecule 3D Structure Browser</title>
    <script src="https://3Dmol.org/build/3Dmol.js"></script>
    <style>
        body { font-family: Arial, sans-serif; background: #f5f5f5; }
        .main { display: flex; }
        .viewer-box { width: 600px; height: 480px; margin: 40px; border: 1px solid #ccc; background: #fff; border-radius: 8px; }
        .list-box { margin: 40px; background: #fff; border-radius: 8px; box-shadow: 0 2px 8px #0001; padding: 20px; min-width: 400px; }
        .mol-name { cursor: pointer; padding: 8px; border-bottom: 1px solid #eee; }
        .mol-name:hover { background: #f0f0f0; }
        .mol-name.selected { background: #d0eaff; font-weight: bold; }
        h1 { text-align: center; color: #2c3e50; margin-bottom: 30px; }
    </style>
</head>
<body>
<h1>Molecule 3D Structure Browser</h1>
<div class="main">
    <div id="mainviewer" class="viewer-box"></div>
    <div class="list-box">
__NAME_LIST__    </div>
</div>
<script>
const xyzData = __XYZ_DATA__;
function decode64(b64) {
    return decodeURIComponent(escape(window.atob(b64)));
}
let viewer = $3Dmol.createViewer("mainviewer", {backgroundColor: "white"});
function showMol(idx) {
    let xyz = decode64(xyzData[idx]);
    // Drop the previous model before adding the new one; switching must
    // never superimpose geometries.
    viewer.clear();
    viewer.addModel(xyz, "xyz");
    viewer.setStyle({}, {stick:{radius:0.2}, sphere:{scale:0.3}});
    viewer.zoomTo();
    viewer.render();
    let names = document.getElementsByClassName("mol-name");
    for (let i = 0; i < names.length; i++) {
        names[i].classList.remove("selected");
    }
    document.getElementById("molname_" + idx).classList.add("selected");
}
if (xyzData.length > 0) showMol(0);
</script>
</body>
</html>
"#;

/// Renders the interactive single-page viewer. Entries without a raw
/// geometry payload cannot occur in documents built by the raw-geometry
/// packager; they would desynchronize the name/payload arrays, so they
/// are rejected by debug assertion and encoded as empty payloads.
pub fn render(document: &ViewerDocument) -> String {
    let mut name_list = String::new();
    let mut payloads: Vec<String> = Vec::with_capacity(document.len());

    for entry in document.entries() {
        let _ = writeln!(
            name_list,
            "        <div class=\"mol-name\" onclick=\"showMol({idx})\" id=\"molname_{idx}\">{name}</div>",
            idx = entry.index,
            name = escape_html(&entry.name),
        );
        let b64 = entry.payload.xyz_base64();
        debug_assert!(b64.is_some(), "viewer document carries a non-XYZ payload");
        payloads.push(b64.unwrap_or_default());
    }

    // serde_json output is valid JS array literal text; base64 never needs
    // further escaping.
    let xyz_data = serde_json::to_string(&payloads).unwrap_or_else(|_| "[]".to_string());

    PAGE_TEMPLATE
        .replace("__NAME_LIST__", &name_list)
        .replace("__XYZ_DATA__", &xyz_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::document::{EntryPayload, ViewerDocument};

    fn xyz_doc(names: &[&str]) -> ViewerDocument {
        ViewerDocument::assemble(names.iter().map(|n| {
            (
                n.to_string(),
                EntryPayload::RawXyz(format!("1\n{n}\nH 0.0 0.0 0.0\n")),
            )
        }))
    }

    #[test]
    fn name_list_and_payload_array_are_index_aligned() {
        let html = render(&xyz_doc(&["water", "benzene", "ethanol"]));
        for idx in 0..3 {
            assert!(html.contains(&format!("id=\"molname_{idx}\"")));
            assert!(html.contains(&format!("showMol({idx})")));
        }
        // Three base64 payloads in the embedded array.
        let array_start = html.find("const xyzData = [").unwrap();
        let array_end = html[array_start..].find("];").unwrap() + array_start;
        let array = &html[array_start..array_end];
        assert_eq!(array.matches('"').count(), 6);
    }

    #[test]
    fn selector_clears_before_rendering_and_defaults_to_first() {
        let html = render(&xyz_doc(&["water"]));
        let clear = html.find("viewer.clear()").unwrap();
        let add = html.find("viewer.addModel").unwrap();
        assert!(clear < add, "previous model must be dropped before adding");
        assert!(html.contains("if (xyzData.length > 0) showMol(0);"));
        assert!(html.contains("classList.remove(\"selected\")"));
        assert!(html.contains("classList.add(\"selected\")"));
    }

    #[test]
    fn empty_document_stays_idle() {
        let html = render(&ViewerDocument::assemble(Vec::new()));
        assert!(html.contains("const xyzData = [];"));
        assert!(!html.contains("molname_0"));
    }

    #[test]
    fn payloads_decode_back_to_xyz() {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine as _;

        let html = render(&xyz_doc(&["water"]));
        let start = html.find("const xyzData = ").unwrap() + "const xyzData = ".len();
        let end = html[start..].find(';').unwrap() + start;
        let payloads: Vec<String> = serde_json::from_str(&html[start..end]).unwrap();
        let decoded = String::from_utf8(STANDARD.decode(&payloads[0]).unwrap()).unwrap();
        assert!(decoded.contains("H 0.0 0.0 0.0"));
    }
}
