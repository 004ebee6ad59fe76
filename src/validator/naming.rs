//! Naming convention checks
//!
//! Geometry and material names must match one of a fixed set of categories,
//! every name must stick to ASCII letters, digits and underscores, and no
//! base name may repeat within its namespace.

use crate::config::CheckConfig;
use crate::finding::Status;
use crate::report::NamingReport;
use crate::scene::Scene;
use regex::RegexSet;
use std::collections::HashSet;
use std::sync::LazyLock;

/// A closed set of naming categories, each with a full-match pattern and a
/// human-readable shape
pub trait NamingCategory: Copy + 'static {
    /// Every category, in the order patterns are tried
    const ALL: &'static [Self];

    /// Anchored regular expression for names of this category
    fn pattern(self) -> &'static str;

    /// Expected shape shown to users
    fn expected(self) -> &'static str;

    /// Compiled patterns of [`ALL`](Self::ALL), index-aligned
    fn regex_set() -> &'static RegexSet;

    /// Category a name belongs to, if any
    fn classify(name: &str) -> Option<Self> {
        Self::regex_set()
            .matches(name)
            .iter()
            .next()
            .map(|i| Self::ALL[i])
    }

    /// Every accepted shape, comma separated
    fn expected_formats() -> String {
        Self::ALL
            .iter()
            .map(|c| c.expected())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Geometry (object) naming categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryCategory {
    /// OKS building geometry
    Main,
    /// Translucent OKS parts
    MainGlass,
    /// Ground landscaping
    Ground,
    /// Ground furniture elements
    GroundEl,
    /// Translucent ground furniture parts
    GroundElGlass,
    /// Vegetation
    Flora,
}

static GEOMETRY_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(GeometryCategory::ALL.iter().map(|c| c.pattern()))
        .expect("geometry naming patterns")
});

impl NamingCategory for GeometryCategory {
    const ALL: &'static [Self] = &[
        GeometryCategory::Main,
        GeometryCategory::MainGlass,
        GeometryCategory::Ground,
        GeometryCategory::GroundEl,
        GeometryCategory::GroundElGlass,
        GeometryCategory::Flora,
    ];

    fn pattern(self) -> &'static str {
        match self {
            GeometryCategory::Main => r"^SM_[A-Za-z0-9_]+_[0-9]+_Main$",
            GeometryCategory::MainGlass => r"^SM_[A-Za-z0-9_]+_[0-9]+_MainGlass$",
            GeometryCategory::Ground => r"^SM_[A-Za-z0-9_]+_Ground$",
            GeometryCategory::GroundEl => r"^SM_[A-Za-z0-9_]+_GroundEl$",
            GeometryCategory::GroundElGlass => r"^SM_[A-Za-z0-9_]+_GroundElGlass$",
            GeometryCategory::Flora => r"^SM_[A-Za-z0-9_]+_Flora$",
        }
    }

    fn expected(self) -> &'static str {
        match self {
            GeometryCategory::Main => "SM_[street name]_[building number]_Main",
            GeometryCategory::MainGlass => "SM_[street name]_[building number]_MainGlass",
            GeometryCategory::Ground => "SM_[street name]_Ground",
            GeometryCategory::GroundEl => "SM_[street name]_GroundEl",
            GeometryCategory::GroundElGlass => "SM_[street name]_GroundElGlass",
            GeometryCategory::Flora => "SM_[street name]_Flora",
        }
    }

    fn regex_set() -> &'static RegexSet {
        &GEOMETRY_PATTERNS
    }
}

/// Material naming categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialCategory {
    /// OKS material slot
    Main,
    /// One of the seven shared glass materials
    Glass,
    /// Ground material slot
    Ground,
    /// GroundEl material slot
    GroundEl,
    /// Flora material slot
    Flora,
}

static MATERIAL_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(MaterialCategory::ALL.iter().map(|c| c.pattern()))
        .expect("material naming patterns")
});

impl NamingCategory for MaterialCategory {
    const ALL: &'static [Self] = &[
        MaterialCategory::Main,
        MaterialCategory::Glass,
        MaterialCategory::Ground,
        MaterialCategory::GroundEl,
        MaterialCategory::Flora,
    ];

    fn pattern(self) -> &'static str {
        match self {
            MaterialCategory::Main => r"^M_[A-Za-z0-9_]+_[0-9]+_Main_[0-9]+$",
            MaterialCategory::Glass => r"^M_Glass_0[1-7]$",
            MaterialCategory::Ground => r"^M_[A-Za-z0-9_]+_Ground_[0-9]+$",
            MaterialCategory::GroundEl => r"^M_[A-Za-z0-9_]+_GroundEl_[0-9]+$",
            MaterialCategory::Flora => r"^M_[A-Za-z0-9_]+_Flora_[0-9]+$",
        }
    }

    fn expected(self) -> &'static str {
        match self {
            MaterialCategory::Main => "M_[street name]_[building number]_Main_[slot number]",
            MaterialCategory::Glass => "M_Glass_0[1-7]",
            MaterialCategory::Ground => "M_[street name]_Ground_[slot number]",
            MaterialCategory::GroundEl => "M_[street name]_GroundEl_[slot number]",
            MaterialCategory::Flora => "M_[street name]_Flora_[slot number]",
        }
    }

    fn regex_set() -> &'static RegexSet {
        &MATERIAL_PATTERNS
    }
}

/// Strip a trailing three-digit duplicate suffix such as `.002`
pub fn strip_duplicate_suffix(name: &str) -> &str {
    let bytes = name.as_bytes();
    let n = bytes.len();
    if n >= 4 && bytes[n - 4] == b'.' && bytes[n - 3..].iter().all(u8::is_ascii_digit) {
        &name[..n - 4]
    } else {
        name
    }
}

/// Names whose base (suffix stripped) already appeared earlier, in order
pub fn find_duplicates<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|&name| !seen.insert(strip_duplicate_suffix(name)))
        .collect()
}

/// Report invalid characters in a name
///
/// A trailing `.png` is ignored. Returns `None` when the name is made of
/// ASCII letters, digits and underscores only; otherwise a message with
/// spaces shown as `[space]` and the other offending characters listed in
/// first-occurrence order.
pub fn invalid_characters(name: &str) -> Option<String> {
    let stem = name.strip_suffix(".png").unwrap_or(name);
    let valid = |c: char| c.is_ascii_alphanumeric() || c == '_';
    if !stem.is_empty() && stem.chars().all(valid) {
        return None;
    }

    let mut offending = String::new();
    for c in stem.chars() {
        if !valid(c) && c != ' ' && !offending.contains(c) {
            offending.push(c);
        }
    }
    let shown = if offending.is_empty() {
        "space"
    } else {
        offending.as_str()
    };
    Some(format!(
        "{}: Invalid chars ({})",
        name.replace(' ', "[space]"),
        shown
    ))
}

fn classify_entry<C: NamingCategory>(name: &str) -> (bool, Vec<String>) {
    match C::classify(name) {
        Some(_) => (true, vec![format!("{}: PASSED", name)]),
        None => (
            false,
            vec![
                format!("{}: FAILED", name),
                format!("- expected: {}", C::expected_formats()),
            ],
        ),
    }
}

/// Run every naming check over a scene
///
/// Geometry names come from mesh objects, material names from every
/// material, texture names from textures referenced by mesh materials.
/// Pattern failures and invalid characters fail the report; duplicates fail
/// it when `duplicates_fail_naming` is set.
pub fn validate_naming(scene: &Scene, config: &CheckConfig) -> NamingReport {
    let mut report = NamingReport::default();
    let mut passed = true;

    let meshes: Vec<&str> = scene
        .mesh_objects()
        .map(|(object, _)| object.name.as_str())
        .collect();
    let materials: Vec<&str> = scene.materials.iter().map(|m| m.name.as_str()).collect();
    let textures: Vec<&str> = scene
        .referenced_textures()
        .into_iter()
        .filter_map(|id| scene.texture(id))
        .map(|t| t.name.as_str())
        .collect();

    for (names, label) in [
        (&meshes, "geometry"),
        (&materials, "material"),
        (&textures, "texture"),
    ] {
        for name in find_duplicates(names.iter().copied()) {
            report
                .duplicates
                .push(vec![format!("{}: Duplicate {} name detected", name, label)]);
        }
    }

    if meshes.is_empty() {
        report
            .geometry
            .push(vec!["No mesh objects found in the scene.".to_string()]);
    }
    for name in &meshes {
        let (ok, entry) = classify_entry::<GeometryCategory>(name);
        passed &= ok;
        report.geometry.push(entry);
        if let Some(message) = invalid_characters(name) {
            passed = false;
            report.invalid_chars.push(vec![message]);
        }
    }

    for name in &materials {
        let (ok, entry) = classify_entry::<MaterialCategory>(name);
        passed &= ok;
        report.materials.push(entry);
        if let Some(message) = invalid_characters(name) {
            passed = false;
            report.invalid_chars.push(vec![message]);
        }
    }

    for name in &textures {
        match invalid_characters(name) {
            None => report.textures.push(vec![format!("{}: PASSED", name)]),
            Some(message) => {
                passed = false;
                report.textures.push(vec![format!("{}: FAILED", name)]);
                report.invalid_chars.push(vec![message]);
            }
        }
    }

    if config.duplicates_fail_naming && !report.duplicates.is_empty() {
        passed = false;
    }
    report.status = Status::from_ok(passed);
    report
}
