//! Diagnostics report types

use serde::{Deserialize, Serialize};

use super::catalog::MenuResolution;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Stable issue identifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    NoFallbackMenu,
    MultipleFallbackMenus,
    PriorityConflict,
    EmptyMenu,
    OrphanMenuLink,
    UnlinkedProduct,
    UnmatchedProduct,
    OrphanInventoryItem,
    AmbiguousMatch,
    BrokenInventoryLink,
    PlaceholderImage,
    LegacyBucketImage,
    StagingImage,
    BrokenImage,
    StockNotDeducted,
}

impl IssueCode {
    pub fn severity(&self) -> Severity {
        match self {
            Self::NoFallbackMenu
            | Self::MultipleFallbackMenus
            | Self::OrphanMenuLink
            | Self::BrokenInventoryLink
            | Self::BrokenImage
            | Self::StockNotDeducted => Severity::Error,
            Self::PriorityConflict
            | Self::EmptyMenu
            | Self::AmbiguousMatch
            | Self::LegacyBucketImage
            | Self::StagingImage
            | Self::UnlinkedProduct => Severity::Warning,
            Self::UnmatchedProduct | Self::OrphanInventoryItem | Self::PlaceholderImage => {
                Severity::Info
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<i64>,
}

impl DiagnosticIssue {
    pub fn new(code: IssueCode, message: impl Into<String>, entity_id: Option<i64>) -> Self {
        Self {
            severity: code.severity(),
            code,
            message: message.into(),
            entity_id,
        }
    }
}

/// Row counts per table for one store
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableCounts {
    pub menus: i64,
    pub menu_rules: i64,
    pub menu_products: i64,
    pub categories: i64,
    pub products: i64,
    pub inventory_items: i64,
    pub orders: i64,
    pub stock_movements: i64,
}

/// Outcome of an HTTP HEAD against an image URL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageProbeResult {
    pub url: String,
    pub status: Option<u16>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    pub store_id: i64,
    pub store_slug: String,
    pub generated_at: i64,
    pub counts: TableCounts,
    /// Menu served to a context-free visitor
    pub generic_resolution: MenuResolution,
    pub issues: Vec<DiagnosticIssue>,
    #[serde(default)]
    pub image_probes: Vec<ImageProbeResult>,
}

impl DiagnosticsReport {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn issues_with(&self, code: IssueCode) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues.iter().filter(move |i| i.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_takes_severity_from_code() {
        let issue = DiagnosticIssue::new(IssueCode::NoFallbackMenu, "no fallback", None);
        assert_eq!(issue.severity, Severity::Error);
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["code"], "no_fallback_menu");
        assert!(json.get("entity_id").is_none());
    }
}
