// repairlog - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Maintenance record (one input row)
// =============================================================================

/// A single row of the exported maintenance log.
///
/// Hierarchy columns that are missing from the header row are filled with
/// `constants::UNKNOWN_FIELD`; a missing comments column becomes an empty
/// string. Cell values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceRecord {
    /// Production area the machine belongs to.
    pub area: String,

    /// Machine (equipment group) name.
    pub machine_name: String,

    /// Mechanism node on the machine that was repaired.
    pub mechanism_node: String,

    /// Free-text technician comments carrying the problem/solution phrases.
    pub comments: String,
}

// =============================================================================
// Repair instruction (one output entry)
// =============================================================================

/// A deduplicated problem with every distinct solution applied to it on one
/// mechanism node.
///
/// Field order here is the serialised key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairInstruction {
    pub area: String,
    pub equipment_group: String,
    pub component: String,
    pub problem: String,
    pub solution: String,
}

// =============================================================================
// Export format
// =============================================================================

/// Serialisation format of the instruction document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format \"{other}\" (expected json or csv)")),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Problem category
// =============================================================================

/// Coarse classification of a problem description, used for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ProblemCategory {
    Leaks,
    Malfunctions,
    PartReplacement,
    Adjustment,
    Sensors,
    Safety,
    Other,
}

impl ProblemCategory {
    /// Returns all variants in classification priority order.
    pub fn all() -> &'static [ProblemCategory] {
        &[
            ProblemCategory::Leaks,
            ProblemCategory::Malfunctions,
            ProblemCategory::PartReplacement,
            ProblemCategory::Adjustment,
            ProblemCategory::Sensors,
            ProblemCategory::Safety,
            ProblemCategory::Other,
        ]
    }

    /// Lower-case markers that place a problem in this category.
    /// `Other` has none: it is the fallback.
    pub fn markers(&self) -> &'static [&'static str] {
        match self {
            ProblemCategory::Leaks => &["утечка"],
            ProblemCategory::Malfunctions => &["не работает", "неисправ"],
            ProblemCategory::PartReplacement => &["замена", "износ"],
            ProblemCategory::Adjustment => &["калибровка", "настройка"],
            ProblemCategory::Sensors => &["датчик"],
            ProblemCategory::Safety => &["безопасность"],
            ProblemCategory::Other => &[],
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            ProblemCategory::Leaks => "Leaks",
            ProblemCategory::Malfunctions => "Malfunctions",
            ProblemCategory::PartReplacement => "Part replacement",
            ProblemCategory::Adjustment => "Adjustment",
            ProblemCategory::Sensors => "Sensors",
            ProblemCategory::Safety => "Safety",
            ProblemCategory::Other => "Other",
        }
    }

    /// Classify a problem description by the first category whose marker it
    /// contains (case-insensitive).
    pub fn classify(problem: &str) -> ProblemCategory {
        let lower = problem.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|cat| cat.markers().iter().any(|m| lower.contains(m)))
            .unwrap_or(ProblemCategory::Other)
    }
}

impl std::fmt::Display for ProblemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
