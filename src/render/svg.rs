use crate::chemistry::elements::{covalent_radius, cpk_color};
use crate::core::structure::{Bond, BondOrder, Molecule, StructureError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt::Write as _;

// ============================================================================
// STYLE
// ============================================================================

/// Deterministic depiction style. These are configuration constants of the
/// pipeline, not runtime-discovered values; two runs over the same
/// geometry produce byte-identical SVG.
#[derive(Debug, Clone)]
pub struct DepictionStyle {
    pub width: u32,
    pub height: u32,
    pub padding_px: f64,
    /// Stroke width of a bond line, in SVG user units.
    pub bond_width: f64,
    /// Separation between the parallel strokes of a multiple bond, in
    /// world (Angstrom) units.
    pub multi_bond_offset: f64,
    /// Draw wedge/hash strokes for bonds with a strong out-of-plane
    /// component.
    pub stereo_annotations: bool,
    /// Label every atom with its index in the structure.
    pub atom_indices: bool,
    pub background: String,
}

impl Default for DepictionStyle {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            padding_px: 30.0,
            bond_width: 2.0,
            multi_bond_offset: 0.2,
            stereo_annotations: true,
            atom_indices: false,
            background: "#ffffff".to_string(),
        }
    }
}

/// A rendered vector depiction. Immutable once produced; the base64 data
/// URI is the embeddable payload used by the packagers.
#[derive(Debug, Clone, PartialEq)]
pub struct Depiction {
    pub svg: String,
}

impl Depiction {
    pub fn as_bytes(&self) -> &[u8] {
        self.svg.as_bytes()
    }

    /// Wraps the raw SVG as an inline `data:` URI with its MIME tag.
    pub fn to_data_uri(&self) -> String {
        format!("data:image/svg+xml;base64,{}", STANDARD.encode(self.svg.as_bytes()))
    }
}

// ============================================================================
// PROJECTION GEOMETRY
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Vec2 {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

#[derive(Debug, Clone, Copy)]
struct Transform {
    scale: f64,
    min_x: f64,
    max_y: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Transform {
    fn to_screen(&self, p: Vec2) -> Vec2 {
        Vec2 {
            x: self.offset_x + (p.x - self.min_x) * self.scale,
            y: self.offset_y + (self.max_y - p.y) * self.scale,
        }
    }

    fn length_to_screen(&self, len: f64) -> f64 {
        len * self.scale
    }
}

/// Orthographic XY projection; the discarded z component drives the
/// stereo annotation.
fn project(mol: &Molecule) -> (Vec<Vec2>, Vec<f64>) {
    let projected = mol
        .atoms
        .iter()
        .map(|a| Vec2 {
            x: a.position.x,
            y: a.position.y,
        })
        .collect();
    let depths = mol.atoms.iter().map(|a| a.position.z).collect();
    (projected, depths)
}

fn compute_bounds(points: &[Vec2], padding: f64) -> Bounds {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    // Degenerate extents (single atom, linear molecules along one axis)
    // get a unit box so the transform stays finite.
    if max_x - min_x < 1e-9 {
        min_x -= 1.0;
        max_x += 1.0;
    }
    if max_y - min_y < 1e-9 {
        min_y -= 1.0;
        max_y += 1.0;
    }

    Bounds {
        min_x: min_x - padding,
        max_x: max_x + padding,
        min_y: min_y - padding,
        max_y: max_y + padding,
    }
}

fn compute_transform(bounds: &Bounds, style: &DepictionStyle) -> Transform {
    let world_w = bounds.max_x - bounds.min_x;
    let world_h = bounds.max_y - bounds.min_y;
    let avail_w = style.width as f64 - 2.0 * style.padding_px;
    let avail_h = style.height as f64 - 2.0 * style.padding_px;
    let scale = (avail_w / world_w).min(avail_h / world_h);

    // Center the fitted drawing on the canvas.
    let offset_x = style.padding_px + (avail_w - world_w * scale) / 2.0;
    let offset_y = style.padding_px + (avail_h - world_h * scale) / 2.0;

    Transform {
        scale,
        min_x: bounds.min_x,
        max_y: bounds.max_y,
        offset_x,
        offset_y,
    }
}

// ============================================================================
// RENDERING
// ============================================================================

/// Out-of-plane displacement (Angstroms) past which a bond is annotated
/// as a wedge or hash.
const STEREO_DEPTH_THRESHOLD: f64 = 0.35;

/// Renders a molecule into a deterministic SVG depiction.
///
/// A bondless structure degenerates to isolated atom glyphs; an empty
/// structure is an error.
pub fn render(mol: &Molecule, style: &DepictionStyle) -> Result<Depiction, StructureError> {
    if mol.atoms.is_empty() {
        return Err(StructureError::EmptyAtoms(mol.name.clone()));
    }

    let (projected, depths) = project(mol);
    let bounds = compute_bounds(&projected, 0.6);
    let transform = compute_transform(&bounds, style);

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{}' height='{}' viewBox='0 0 {} {}'>",
        style.width, style.height, style.width, style.height
    );
    let _ = write!(
        svg,
        "<rect width='100%' height='100%' fill='{}'/>",
        style.background
    );
    let _ = write!(svg, "<title>{}</title>", escape_xml(&mol.name));

    // 1. Bonds
    let _ = write!(
        svg,
        "<g stroke='#4a4a4a' stroke-width='{}' fill='#4a4a4a'>",
        style.bond_width
    );
    for bond in &mol.bonds {
        draw_bond(&mut svg, bond, &projected, &depths, &transform, style);
    }
    svg.push_str("</g>");

    // 2. Atom glyphs
    svg.push_str("<g stroke='#222222' stroke-width='1'>");
    for (i, atom) in mol.atoms.iter().enumerate() {
        let c = transform.to_screen(projected[i]);
        let r = glyph_radius(&atom.element);
        let _ = write!(
            svg,
            "<circle cx='{:.2}' cy='{:.2}' r='{:.2}' fill='{}'/>",
            c.x,
            c.y,
            r,
            cpk_color(&atom.element)
        );
    }
    svg.push_str("</g>");

    // 3. Element labels
    svg.push_str("<g font-size='11' font-family='Arial, sans-serif' text-anchor='middle'>");
    for (i, atom) in mol.atoms.iter().enumerate() {
        let c = transform.to_screen(projected[i]);
        let _ = write!(
            svg,
            "<text x='{:.2}' y='{:.2}' dominant-baseline='middle' fill='{}'>{}</text>",
            c.x,
            c.y,
            label_color(&atom.element),
            escape_xml(&atom.element)
        );
    }
    svg.push_str("</g>");

    // 4. Optional index labels
    if style.atom_indices {
        svg.push_str("<g font-size='9' font-family='Arial, sans-serif' fill='#666666'>");
        for (i, _) in mol.atoms.iter().enumerate() {
            let c = transform.to_screen(projected[i]);
            let r = glyph_radius(&mol.atoms[i].element);
            let _ = write!(
                svg,
                "<text x='{:.2}' y='{:.2}'>{}</text>",
                c.x + r + 2.0,
                c.y - r - 2.0,
                i
            );
        }
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    Ok(Depiction { svg })
}

fn draw_bond(
    svg: &mut String,
    bond: &Bond,
    projected: &[Vec2],
    depths: &[f64],
    transform: &Transform,
    style: &DepictionStyle,
) {
    let a = transform.to_screen(projected[bond.a]);
    let b = transform.to_screen(projected[bond.b]);
    let depth_delta = depths[bond.b] - depths[bond.a];

    // Out-of-plane single bonds become wedge (toward viewer) or hash
    // (away) strokes; this is the only stereo cue a pure-geometry
    // pipeline can honor.
    if style.stereo_annotations
        && bond.order == BondOrder::Single
        && depth_delta.abs() > STEREO_DEPTH_THRESHOLD
    {
        if depth_delta > 0.0 {
            draw_wedge(svg, a, b);
        } else {
            draw_hash(svg, a, b, style);
        }
        return;
    }

    let strokes = bond.order.strokes();
    let offset_px = transform.length_to_screen(style.multi_bond_offset);
    let (nx, ny) = unit_normal(a, b);

    for s in 0..strokes {
        // Center the stroke fan around the bond axis.
        let shift = (s as f64 - (strokes as f64 - 1.0) / 2.0) * offset_px;
        let _ = write!(
            svg,
            "<line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}'/>",
            a.x + nx * shift,
            a.y + ny * shift,
            b.x + nx * shift,
            b.y + ny * shift
        );
    }
}

/// Filled triangle from the near end to a widened far end.
fn draw_wedge(svg: &mut String, a: Vec2, b: Vec2) {
    let (nx, ny) = unit_normal(a, b);
    let half_width = 3.0;
    let _ = write!(
        svg,
        "<polygon points='{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}' stroke='none'/>",
        a.x,
        a.y,
        b.x + nx * half_width,
        b.y + ny * half_width,
        b.x - nx * half_width,
        b.y - ny * half_width
    );
}

/// Dashed stroke standing in for the hashed "receding" bond.
fn draw_hash(svg: &mut String, a: Vec2, b: Vec2, style: &DepictionStyle) {
    let _ = write!(
        svg,
        "<line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' stroke-dasharray='{:.1} {:.1}'/>",
        a.x,
        a.y,
        b.x,
        b.y,
        style.bond_width * 1.5,
        style.bond_width * 1.5
    );
}

fn unit_normal(a: Vec2, b: Vec2) -> (f64, f64) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt().max(1e-9);
    (-dy / len, dx / len)
}

fn glyph_radius(element: &str) -> f64 {
    5.0 + 6.0 * covalent_radius(element)
}

fn label_color(element: &str) -> &'static str {
    // Dark glyphs (carbon) need a light label.
    if element == "C" {
        "#ffffff"
    } else {
        "#111111"
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
}
