use crate::core::connectivity::{connected_components, BondInference};
use crate::core::structure::{Molecule, StructureError};
use crate::io::xyz::{self, ParseError};
use crate::physics::refine::{GeometryRefiner, RefinementOutcome};
use crate::render::svg::{self, Depiction, DepictionStyle};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// PER-MOLECULE OUTCOMES
// ============================================================================

/// Why a molecule was excluded from the outputs. Every variant is fatal
/// for that molecule only; the batch always continues.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("source file missing: {0:?}")]
    MissingSourceFile(PathBuf),
    #[error("parse failure: {0}")]
    Parse(#[from] ParseError),
    #[error("structure failure: {0}")]
    Structure(#[from] StructureError),
}

impl SkipReason {
    /// Missing inputs are "skipped"; everything else counts as "failed"
    /// in the batch summary.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, SkipReason::MissingSourceFile(_))
    }
}

/// A molecule that made it through the whole pipeline. `row` is the
/// position in the source index table (not the emission index, which the
/// packager assigns after filtering).
#[derive(Debug)]
pub struct ProcessedMolecule {
    pub row: usize,
    pub name: String,
    pub molecule: Molecule,
    /// Verbatim source text, embedded untouched by the raw-geometry
    /// packager.
    pub raw_xyz: String,
    pub depiction: Depiction,
    pub refinement: RefinementOutcome,
}

#[derive(Debug)]
pub struct SkippedMolecule {
    pub row: usize,
    pub name: String,
    pub reason: SkipReason,
}

pub type BatchOutcome = Result<ProcessedMolecule, SkippedMolecule>;

// ============================================================================
// BATCH PROCESSING
// ============================================================================

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub structure_dir: PathBuf,
    pub skip_refine: bool,
    pub style: DepictionStyle,
}

impl BatchOptions {
    pub fn new(structure_dir: impl Into<PathBuf>) -> Self {
        Self {
            structure_dir: structure_dir.into(),
            skip_refine: false,
            style: DepictionStyle::default(),
        }
    }
}

/// Runs the per-molecule pipeline over every name in table order and
/// collects explicit outcomes. No molecule can abort the batch; each row
/// yields exactly one Ok or one Err, so `outcomes.len() == names.len()`
/// always holds.
pub fn process_batch(names: &[String], options: &BatchOptions) -> Vec<BatchOutcome> {
    names
        .iter()
        .enumerate()
        .map(|(row, name)| {
            process_one(row, name, options).map_err(|reason| SkippedMolecule {
                row,
                name: name.clone(),
                reason,
            })
        })
        .collect()
}

/// Parse → build → infer bonds → refine (best effort) → render.
fn process_one(
    row: usize,
    name: &str,
    options: &BatchOptions,
) -> Result<ProcessedMolecule, SkipReason> {
    let path = xyz_path(&options.structure_dir, name);
    if !path.exists() {
        return Err(SkipReason::MissingSourceFile(path));
    }

    let raw_xyz = fs::read_to_string(&path).map_err(ParseError::from)?;
    let atoms = xyz::parse_str(&raw_xyz)?;
    let molecule = Molecule::from_atoms(name, atoms)?;

    let bonds = BondInference::default().infer(&molecule);
    let molecule = molecule.with_bonds(bonds)?;

    let (molecule, refinement) = if options.skip_refine {
        (
            molecule,
            RefinementOutcome::Skipped("disabled by configuration".to_string()),
        )
    } else {
        GeometryRefiner::default().relax(&molecule)
    };

    let depiction = svg::render(&molecule, &options.style)?;

    Ok(ProcessedMolecule {
        row,
        name: name.to_string(),
        molecule,
        raw_xyz,
        depiction,
        refinement,
    })
}

fn xyz_path(structure_dir: &Path, name: &str) -> PathBuf {
    structure_dir.join(format!("{}.xyz", name))
}

// ============================================================================
// BATCH REPORT
// ============================================================================

/// User-visible batch summary: counts plus the per-molecule diagnostics
/// that were downgraded from errors.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Processed structures whose bond graph has more than one connected
    /// component (disconnected atom clouds, multi-fragment files).
    pub fragmented: usize,
    pub refinement_warnings: Vec<String>,
    pub exclusions: Vec<String>,
}

impl BatchReport {
    pub fn from_outcomes(outcomes: &[BatchOutcome]) -> Self {
        let mut report = Self::default();

        for outcome in outcomes {
            match outcome {
                Ok(done) => {
                    report.processed += 1;
                    if connected_components(&done.molecule) > 1 {
                        report.fragmented += 1;
                    }
                    if done.refinement.is_warning() {
                        report.refinement_warnings.push(format!(
                            "{}: refinement {}",
                            done.name,
                            done.refinement.describe()
                        ));
                    }
                }
                Err(skip) => {
                    if skip.reason.is_missing_file() {
                        report.skipped += 1;
                    } else {
                        report.failed += 1;
                    }
                    report
                        .exclusions
                        .push(format!("{}: {}", skip.name, skip.reason));
                }
            }
        }
        report
    }

    /// Bullet summary printed by the driver.
    pub fn describe(&self) -> String {
        let mut out = format!(
            "--- Batch Report ---\n\
             • Processed: {}\n\
             • Skipped (missing files): {}\n\
             • Failed: {}\n\
             • Fragmented structures: {}",
            self.processed, self.skipped, self.failed, self.fragmented
        );
        if !self.refinement_warnings.is_empty() {
            out.push_str("\n• Refinement warnings:");
            for warning in &self.refinement_warnings {
                out.push_str(&format!("\n    - {}", warning));
            }
        }
        if !self.exclusions.is_empty() {
            out.push_str("\n• Excluded molecules:");
            for line in &self.exclusions {
                out.push_str(&format!("\n    - {}", line));
            }
        }
        out
    }
}
