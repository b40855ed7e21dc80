use crate::render::svg::Depiction;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

// ============================================================================
// PACKAGING UNITS
// ============================================================================

/// Per-molecule payload carried by a packaged document. The two packaging
/// strategies use one variant each: precomputed images for the static
/// gallery, verbatim XYZ text for the interactive viewer.
#[derive(Debug, Clone)]
pub enum EntryPayload {
    Image(Depiction),
    RawXyz(String),
}

impl EntryPayload {
    /// Inline `data:` URI for image payloads.
    pub fn image_uri(&self) -> Option<String> {
        match self {
            EntryPayload::Image(depiction) => Some(depiction.to_data_uri()),
            EntryPayload::RawXyz(_) => None,
        }
    }

    /// Base64 of the raw XYZ text for geometry payloads.
    pub fn xyz_base64(&self) -> Option<String> {
        match self {
            EntryPayload::RawXyz(text) => Some(STANDARD.encode(text.as_bytes())),
            EntryPayload::Image(_) => None,
        }
    }
}

/// One molecule inside a packaged document. `index` always equals the
/// entry's position in the owning document.
#[derive(Debug, Clone)]
pub struct MoleculeEntry {
    pub index: usize,
    pub name: String,
    pub payload: EntryPayload,
}

/// The final packaging artifact: an ordered, write-once entry sequence.
/// The client-side "active" pointer defaults to index 0 and lives in the
/// rendered document, not here.
#[derive(Debug, Clone)]
pub struct ViewerDocument {
    entries: Vec<MoleculeEntry>,
}

impl ViewerDocument {
    /// Assembles a document from (name, payload) pairs in emission order.
    /// Indices are assigned 0..count-1 here, so index and display order
    /// can never disagree even when upstream rows were skipped.
    pub fn assemble(items: impl IntoIterator<Item = (String, EntryPayload)>) -> Self {
        let entries = items
            .into_iter()
            .enumerate()
            .map(|(index, (name, payload))| MoleculeEntry {
                index,
                name,
                payload,
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[MoleculeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
