//! Issue and report domain models.
//!
//! These types describe what a completed analysis looks like: per-file
//! findings, a severity-bucketed summary, and derived recommendations.
//! An [`AnalysisReport`] is the only analysis output that survives in the
//! task record; individual [`FileAnalysis`] values are transient inputs
//! to aggregation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a single finding is.
///
/// The ordering is meaningful (`Low < Medium < High < Critical`) and is
/// relied on by the recommendation rules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All severity levels in ascending order.
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// One finding reported against a specific file and line.
///
/// Immutable once produced by a strategy. `kind` is an open category:
/// strategies may invent their own, the well-known ones are provided as
/// constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Open category, e.g. `"style"`, `"bug"`, `"security"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// 1-based line number; `0` means the finding applies to the whole file.
    pub line: u32,
    pub description: String,
    pub suggestion: String,
    pub severity: Severity,
}

impl Issue {
    pub const KIND_STYLE: &'static str = "style";
    pub const KIND_BUG: &'static str = "bug";
    pub const KIND_PERFORMANCE: &'static str = "performance";
    pub const KIND_SECURITY: &'static str = "security";
    /// Synthetic kind recorded when a strategy invocation itself failed.
    pub const KIND_ANALYSIS_ERROR: &'static str = "analysis-error";

    /// Line number marking a file-level finding.
    pub const FILE_LEVEL: u32 = 0;

    /// Creates the synthetic file-level issue recorded when the analysis
    /// strategy failed for one file. The failure is isolated here instead
    /// of failing the whole task.
    pub fn analysis_error(message: impl Into<String>) -> Self {
        Self {
            kind: Self::KIND_ANALYSIS_ERROR.to_string(),
            line: Self::FILE_LEVEL,
            description: format!("Analysis failed: {}", message.into()),
            suggestion: "Manual review required".to_string(),
            severity: Severity::Medium,
        }
    }
}

/// All findings for one file, in the order the strategy produced them.
///
/// Transient: produced by one strategy invocation, consumed by the
/// aggregator, persisted only as part of the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysis {
    /// File basename, e.g. `"main.py"`.
    pub name: String,
    /// Repository-relative path, e.g. `"src/main.py"`.
    pub path: String,
    pub lines_analyzed: u32,
    pub issues: Vec<Issue>,
}

impl FileAnalysis {
    /// Creates a file analysis, deriving `name` from the path's last
    /// component.
    pub fn new(path: impl Into<String>, lines_analyzed: u32, issues: Vec<Issue>) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        Self {
            name,
            path,
            lines_analyzed,
            issues,
        }
    }
}

/// Severity-bucketed counts plus detected languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_files: usize,
    pub total_issues: usize,
    pub critical_issues: usize,
    pub high_issues: usize,
    pub medium_issues: usize,
    pub low_issues: usize,
    /// Sorted, deduplicated; unknown file extensions are simply omitted.
    pub languages_detected: Vec<String>,
}

impl ReportSummary {
    /// Returns the issue count for one severity bucket.
    pub fn count_for(&self, severity: Severity) -> usize {
        match severity {
            Severity::Low => self.low_issues,
            Severity::Medium => self.medium_issues,
            Severity::High => self.high_issues,
            Severity::Critical => self.critical_issues,
        }
    }

    /// Adds one issue at the given severity to the buckets.
    pub fn record(&mut self, severity: Severity) {
        self.total_issues += 1;
        match severity {
            Severity::Low => self.low_issues += 1,
            Severity::Medium => self.medium_issues += 1,
            Severity::High => self.high_issues += 1,
            Severity::Critical => self.critical_issues += 1,
        }
    }
}

/// The final structured output of a completed task.
///
/// `files` preserves input order, so aggregating the same sequence twice
/// yields an identical report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub files: Vec<FileAnalysis>,
    pub summary: ReportSummary,
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        let parsed: Severity = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(parsed, Severity::Critical);
    }

    #[test]
    fn test_issue_kind_serializes_as_type() {
        let issue = Issue {
            kind: Issue::KIND_BUG.to_string(),
            line: 3,
            description: "Bare except clause".to_string(),
            suggestion: "Catch specific exceptions".to_string(),
            severity: Severity::High,
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "bug");
        assert_eq!(json["line"], 3);
    }

    #[test]
    fn test_file_analysis_derives_name_from_path() {
        let fa = FileAnalysis::new("src/app/main.py", 10, vec![]);
        assert_eq!(fa.name, "main.py");
        assert_eq!(fa.path, "src/app/main.py");

        let bare = FileAnalysis::new("README.md", 1, vec![]);
        assert_eq!(bare.name, "README.md");
    }

    #[test]
    fn test_summary_record_updates_buckets_and_total() {
        let mut summary = ReportSummary::default();
        summary.record(Severity::High);
        summary.record(Severity::High);
        summary.record(Severity::Low);

        assert_eq!(summary.total_issues, 3);
        assert_eq!(summary.count_for(Severity::High), 2);
        assert_eq!(summary.count_for(Severity::Low), 1);
        assert_eq!(summary.count_for(Severity::Critical), 0);
    }

    #[test]
    fn test_analysis_error_issue_is_file_level() {
        let issue = Issue::analysis_error("strategy timed out");
        assert_eq!(issue.kind, Issue::KIND_ANALYSIS_ERROR);
        assert_eq!(issue.line, Issue::FILE_LEVEL);
        assert!(issue.description.contains("strategy timed out"));
    }
}
