//! Recommendation rule table.
//!
//! Recommendations are derived from the report summary by a fixed
//! ordered rule list, so the output is stable and testable. The table is
//! configuration data, not hard-coded logic: deployments can replace the
//! messages, thresholds, and tooling hints wholesale.

use crate::report::{ReportSummary, Severity};
use serde::{Deserialize, Serialize};

/// Placeholder substituted with the bucket count in rule messages.
const COUNT_PLACEHOLDER: &str = "{count}";

/// Emits a message when the summary has any issues at one severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityRule {
    pub severity: Severity,
    /// Message template; `{count}` is replaced with the bucket count.
    pub message: String,
}

/// Emits a tooling hint once per detected language, independent of issue
/// counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageHint {
    pub language: String,
    pub hint: String,
}

/// The ordered recommendation rule list.
///
/// Evaluation order is fixed: severity rules first, in table order, then
/// language hints in the summary's (sorted) language order. Rules that
/// do not match emit nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRules {
    #[serde(default)]
    pub severity_rules: Vec<SeverityRule>,
    #[serde(default)]
    pub language_hints: Vec<LanguageHint>,
}

impl Default for RecommendationRules {
    fn default() -> Self {
        Self {
            severity_rules: vec![
                SeverityRule {
                    severity: Severity::Critical,
                    message: "Address the {count} critical issue(s) before merging"
                        .to_string(),
                },
                SeverityRule {
                    severity: Severity::High,
                    message: "Review {count} high-priority issue(s)".to_string(),
                },
            ],
            language_hints: vec![
                LanguageHint {
                    language: "python".to_string(),
                    hint: "Consider running pylint or flake8 on the Python changes"
                        .to_string(),
                },
                LanguageHint {
                    language: "javascript".to_string(),
                    hint: "Consider running eslint and prettier on the JavaScript changes"
                        .to_string(),
                },
                LanguageHint {
                    language: "typescript".to_string(),
                    hint: "Consider running eslint with typescript-eslint on the TypeScript changes"
                        .to_string(),
                },
                LanguageHint {
                    language: "rust".to_string(),
                    hint: "Consider running cargo clippy on the Rust changes".to_string(),
                },
                LanguageHint {
                    language: "go".to_string(),
                    hint: "Consider running go vet on the Go changes".to_string(),
                },
            ],
        }
    }
}

impl RecommendationRules {
    /// Evaluates the rule list against a summary.
    ///
    /// Deterministic: same summary, same output, in the documented order.
    pub fn evaluate(&self, summary: &ReportSummary) -> Vec<String> {
        let mut recommendations = Vec::new();

        for rule in &self.severity_rules {
            let count = summary.count_for(rule.severity);
            if count > 0 {
                recommendations.push(rule.message.replace(COUNT_PLACEHOLDER, &count.to_string()));
            }
        }

        // languages_detected is sorted and deduplicated, so each hint
        // fires at most once, in a stable order.
        for language in &summary.languages_detected {
            if let Some(hint) = self
                .language_hints
                .iter()
                .find(|hint| &hint.language == language)
            {
                recommendations.push(hint.hint.clone());
            }
        }

        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_with(critical: usize, high: usize, languages: &[&str]) -> ReportSummary {
        ReportSummary {
            total_files: 1,
            total_issues: critical + high,
            critical_issues: critical,
            high_issues: high,
            medium_issues: 0,
            low_issues: 0,
            languages_detected: languages.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_no_issues_no_languages_yields_nothing() {
        let rules = RecommendationRules::default();
        assert!(rules.evaluate(&ReportSummary::default()).is_empty());
    }

    #[test]
    fn test_high_rule_carries_the_count() {
        let rules = RecommendationRules::default();
        let recs = rules.evaluate(&summary_with(0, 3, &[]));
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains('3'));
        assert!(recs[0].contains("high-priority"));
    }

    #[test]
    fn test_rule_order_is_critical_then_high_then_hints() {
        let rules = RecommendationRules::default();
        let recs = rules.evaluate(&summary_with(1, 2, &["python", "rust"]));
        assert_eq!(recs.len(), 4);
        assert!(recs[0].contains("critical"));
        assert!(recs[1].contains("high-priority"));
        assert!(recs[2].contains("Python"));
        assert!(recs[3].contains("clippy"));
    }

    #[test]
    fn test_languages_without_hints_emit_nothing() {
        let rules = RecommendationRules::default();
        let recs = rules.evaluate(&summary_with(0, 0, &["fortran"]));
        assert!(recs.is_empty());
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let rules = RecommendationRules::default();
        let summary = summary_with(2, 1, &["go", "python"]);
        assert_eq!(rules.evaluate(&summary), rules.evaluate(&summary));
    }
}
