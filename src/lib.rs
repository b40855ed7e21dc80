// ============================================================================
// MODULE DECLARATIONS
// ============================================================================
pub mod batch;
pub mod chemistry;
pub mod core;
pub mod gallery;
pub mod io;
pub mod physics;
pub mod render;

// ============================================================================
// RE-EXPORTS (Public API)
// ============================================================================
pub use crate::batch::{BatchOptions, BatchOutcome, BatchReport, ProcessedMolecule, SkipReason};
pub use crate::core::connectivity::BondInference;
pub use crate::core::structure::{Atom, Bond, BondOrder, Molecule, StructureError};
pub use crate::gallery::document::{EntryPayload, MoleculeEntry, ViewerDocument};
pub use crate::io::index::IndexTable;
pub use crate::io::xyz::ParseError;
pub use crate::physics::refine::{GeometryRefiner, RefinementOutcome};
pub use crate::render::svg::{Depiction, DepictionStyle};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// HIGH-LEVEL INTERFACE
// ============================================================================

/// Configuration for the gallery generation pipeline.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// Tabular index with a `name` column. Ignored when `discover` is set.
    pub index_path: PathBuf,
    /// Directory holding `<name>.xyz` files.
    pub structure_dir: PathBuf,
    /// Static card-grid output (precomputed-image strategy).
    pub gallery_output: PathBuf,
    /// Interactive single-page output (raw-geometry strategy).
    pub viewer_output: PathBuf,
    /// Augmented copy of the index table. Defaults to
    /// `<index stem>_with_images.csv` next to the index.
    pub augmented_output: Option<PathBuf>,
    /// Take molecule names from `structure_dir/*.xyz` instead of the
    /// index table (no augmented table is written in this mode).
    pub discover: bool,
    pub skip_refine: bool,
    /// Export each refined geometry as XYZ into this directory.
    pub dump_xyz_dir: Option<PathBuf>,
    pub style: DepictionStyle,
}

impl GalleryConfig {
    /// Defaults reproducing a plain "run the batch in the current
    /// directory" invocation.
    pub fn new() -> Self {
        Self {
            index_path: PathBuf::from("lig_descriptor.csv"),
            structure_dir: PathBuf::from("Structure"),
            gallery_output: PathBuf::from("molecule_viewer.html"),
            viewer_output: PathBuf::from("molecule_3d_viewer.html"),
            augmented_output: None,
            discover: false,
            skip_refine: false,
            dump_xyz_dir: None,
            style: DepictionStyle::default(),
        }
    }

    fn augmented_path(&self) -> PathBuf {
        self.augmented_output.clone().unwrap_or_else(|| {
            let stem = self
                .index_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "index".to_string());
            self.index_path
                .with_file_name(format!("{}_with_images.csv", stem))
        })
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The Master Pipeline function.
///
/// Reads the batch input, runs every molecule through
/// parse → build → bond inference → best-effort refinement → rendering,
/// then packages the survivors into both output documents. Per-molecule
/// problems downgrade to skip entries in the report; the only fatal error
/// is an unreadable index (or structure directory in discovery mode).
pub fn generate_gallery(config: &GalleryConfig) -> Result<BatchReport> {
    // 1. INPUT PHASE
    let (names, table) = if config.discover {
        (discover_names(&config.structure_dir)?, None)
    } else {
        let table = IndexTable::read(&config.index_path)?;
        (table.names().to_vec(), Some(table))
    };

    // 2. PROCESSING PHASE
    let options = BatchOptions {
        structure_dir: config.structure_dir.clone(),
        skip_refine: config.skip_refine,
        style: config.style.clone(),
    };
    let outcomes = batch::process_batch(&names, &options);

    // 3. REDUCTION PHASE
    // Successful outcomes, in original relative order, become the entry
    // sequences of both documents; indices are assigned by the assembler.
    let survivors: Vec<&ProcessedMolecule> =
        outcomes.iter().filter_map(|o| o.as_ref().ok()).collect();

    let gallery_doc = ViewerDocument::assemble(
        survivors
            .iter()
            .map(|p| (p.name.clone(), EntryPayload::Image(p.depiction.clone()))),
    );
    let viewer_doc = ViewerDocument::assemble(
        survivors
            .iter()
            .map(|p| (p.name.clone(), EntryPayload::RawXyz(p.raw_xyz.clone()))),
    );

    // 4. OUTPUT PHASE
    fs::write(
        &config.gallery_output,
        gallery::static_page::render(&gallery_doc),
    )
    .with_context(|| format!("Could not write gallery: {:?}", config.gallery_output))?;

    fs::write(&config.viewer_output, gallery::viewer::render(&viewer_doc))
        .with_context(|| format!("Could not write viewer: {:?}", config.viewer_output))?;

    if let Some(table) = &table {
        let mut images: Vec<Option<String>> = vec![None; table.len()];
        for p in &survivors {
            images[p.row] = Some(p.depiction.to_data_uri());
        }
        table.write_augmented(&config.augmented_path(), "structure_image", &images)?;
    }

    if let Some(dump_dir) = &config.dump_xyz_dir {
        fs::create_dir_all(dump_dir)
            .with_context(|| format!("Could not create dump dir: {:?}", dump_dir))?;
        for p in &survivors {
            let path = dump_dir.join(format!("{}.xyz", p.name));
            io::xyz::write_file(&path, &p.molecule, &format!("refined {}", p.name))
                .with_context(|| format!("Could not write refined XYZ: {:?}", path))?;
        }
    }

    // 5. REPORT
    Ok(BatchReport::from_outcomes(&outcomes))
}

/// Discovery mode: every `*.xyz` under the structure directory, sorted by
/// name for a stable batch order.
fn discover_names(structure_dir: &Path) -> Result<Vec<String>> {
    let pattern = structure_dir.join("*.xyz");
    let pattern = pattern
        .to_str()
        .context("Structure directory path is not valid UTF-8")?;

    let mut names: Vec<String> = glob::glob(pattern)
        .context("Invalid glob pattern for structure discovery")?
        .filter_map(|entry| entry.ok())
        .filter_map(|path| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .collect();
    names.sort();
    Ok(names)
}
