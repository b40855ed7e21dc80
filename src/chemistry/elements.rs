use lazy_static::lazy_static;
use regex::Regex;

// ============================================================================
// ELEMENT DATA TABLES
// ============================================================================

/// Covalent radius in Angstroms. Used both for bond inference and for
/// force-field equilibrium lengths.
pub fn covalent_radius(element: &str) -> f64 {
    match element {
        // --- Period 1 ---
        "H" => 0.37,
        "He" => 0.32,
        // --- Period 2 ---
        "Li" => 1.34, "Be" => 0.90, "B" => 0.82, "C" => 0.77, "N" => 0.75,
        "O" => 0.73, "F" => 0.71, "Ne" => 0.69,
        // --- Period 3 ---
        "Na" => 1.54, "Mg" => 1.30, "Al" => 1.18, "Si" => 1.11, "P" => 1.06,
        "S" => 1.02, "Cl" => 0.99, "Ar" => 0.97,
        // --- Period 4 (selected common metals) ---
        "K" => 1.96, "Ca" => 1.74, "Ti" => 1.36, "V" => 1.25, "Cr" => 1.27,
        "Mn" => 1.39, "Fe" => 1.25, "Co" => 1.26, "Ni" => 1.21, "Cu" => 1.38,
        "Zn" => 1.31, "Ga" => 1.26, "Ge" => 1.22, "As" => 1.19, "Se" => 1.16,
        "Br" => 1.14, "Kr" => 1.10,
        // --- Period 5 (selected) ---
        "Ag" => 1.53, "I" => 1.33, "Au" => 1.44,
        // --- Catch-all ---
        _ => 1.00,
    }
}

/// Standard CPK display color as a hex string for SVG fills.
pub fn cpk_color(element: &str) -> &'static str {
    match element {
        "H" => "#ffffff",
        "He" => "#d9ffff",
        "Li" => "#cc80ff",
        "Be" => "#c2ff00",
        "B" => "#ffb5b5",
        "C" => "#333333",
        "N" => "#3050f8",
        "O" => "#ff0d0d",
        "F" => "#90e050",
        "Ne" => "#b3e3f5",
        "Na" => "#ab5cf2",
        "Mg" => "#8aff00",
        "Al" => "#bfa6a6",
        "Si" => "#f0c8a0",
        "P" => "#ff8000",
        "S" => "#ffff30",
        "Cl" => "#1ff01f",
        "K" => "#8f40d4",
        "Ca" => "#3dff00",
        "Fe" => "#e06633",
        "Cu" => "#c88033",
        "Zn" => "#7d80b0",
        "Br" => "#a62929",
        "I" => "#940094",
        "Ag" => "#c0c0c0",
        "Au" => "#ffd123",
        // Hot pink marks unknown species in the depiction.
        _ => "#ff1493",
    }
}

// ============================================================================
// SYMBOL NORMALIZATION
// ============================================================================

lazy_static! {
    // Leading alphabetic part of an atom label, e.g. "O12" or "Fe3+".
    static ref SYMBOL_RE: Regex = Regex::new(r"^[A-Za-z]+").unwrap();
}

/// Normalizes an atom label into a bare element symbol.
///
/// XYZ files in the wild carry labels like "C1", "O12" or lowercase "fe";
/// downstream lookups (radii, colors) expect the canonical symbol.
pub fn normalize_symbol(label: &str) -> String {
    let alpha = SYMBOL_RE
        .find(label)
        .map(|m| m.as_str())
        .unwrap_or(label);

    let mut chars = alpha.chars();
    match chars.next() {
        Some(first) => {
            let rest: String = chars.as_str().to_lowercase();
            format!("{}{}", first.to_uppercase(), rest)
        }
        None => String::new(),
    }
}
