//! Report aggregation.
//!
//! Pure function from an ordered sequence of per-file analyses to the
//! final report. No I/O, no clocks, no randomness: the same input always
//! yields a byte-identical report, which is what makes the lifecycle
//! engine testable end to end.

use revu_core::{AnalysisReport, FileAnalysis, LanguageMap, RecommendationRules, ReportSummary};
use std::collections::BTreeSet;

/// Combines per-file analyses into a single report.
///
/// File order is preserved. Detected languages come from the extension
/// table, sorted and deduplicated; unknown extensions are omitted.
/// Recommendations follow the fixed rule order in `rules`. Zero files or
/// zero issues yield an all-zero summary and no recommendations.
pub fn aggregate(
    files: Vec<FileAnalysis>,
    languages: &LanguageMap,
    rules: &RecommendationRules,
) -> AnalysisReport {
    let mut summary = ReportSummary {
        total_files: files.len(),
        ..ReportSummary::default()
    };

    // BTreeSet gives the sorted, deduplicated language list for free.
    let mut detected = BTreeSet::new();
    for file in &files {
        for issue in &file.issues {
            summary.record(issue.severity);
        }
        if let Some(language) = languages.detect(&file.path) {
            detected.insert(language.to_string());
        }
    }
    summary.languages_detected = detected.into_iter().collect();

    let recommendations = rules.evaluate(&summary);

    AnalysisReport {
        files,
        summary,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revu_core::{Issue, Severity};

    fn issue(severity: Severity) -> Issue {
        Issue {
            kind: Issue::KIND_BUG.to_string(),
            line: 1,
            description: "finding".to_string(),
            suggestion: "fix it".to_string(),
            severity,
        }
    }

    fn defaults() -> (LanguageMap, RecommendationRules) {
        (LanguageMap::default(), RecommendationRules::default())
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let (languages, rules) = defaults();
        let report = aggregate(vec![], &languages, &rules);

        assert_eq!(report.summary.total_files, 0);
        assert_eq!(report.summary.total_issues, 0);
        assert!(report.summary.languages_detected.is_empty());
        assert!(report.recommendations.is_empty());
        assert!(report.files.is_empty());
    }

    #[test]
    fn test_total_issues_matches_per_file_and_per_severity_sums() {
        let (languages, rules) = defaults();
        let files = vec![
            FileAnalysis::new("a.py", 10, vec![issue(Severity::High), issue(Severity::Low)]),
            FileAnalysis::new("b.py", 5, vec![issue(Severity::Critical)]),
            FileAnalysis::new("c.py", 3, vec![]),
        ];
        let report = aggregate(files, &languages, &rules);
        let s = &report.summary;

        let per_file: usize = report.files.iter().map(|f| f.issues.len()).sum();
        let per_severity =
            s.critical_issues + s.high_issues + s.medium_issues + s.low_issues;
        assert_eq!(s.total_issues, 3);
        assert_eq!(s.total_issues, per_file);
        assert_eq!(s.total_issues, per_severity);
        assert_eq!(s.total_files, 3);
    }

    #[test]
    fn test_file_order_is_preserved() {
        let (languages, rules) = defaults();
        let files = vec![
            FileAnalysis::new("z.py", 1, vec![]),
            FileAnalysis::new("a.py", 1, vec![]),
            FileAnalysis::new("m.py", 1, vec![]),
        ];
        let report = aggregate(files, &languages, &rules);
        let paths: Vec<_> = report.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["z.py", "a.py", "m.py"]);
    }

    #[test]
    fn test_languages_are_sorted_deduplicated_and_unknowns_omitted() {
        let (languages, rules) = defaults();
        let files = vec![
            FileAnalysis::new("one.rs", 1, vec![]),
            FileAnalysis::new("two.py", 1, vec![]),
            FileAnalysis::new("three.py", 1, vec![]),
            FileAnalysis::new("blob.unknownext", 1, vec![]),
        ];
        let report = aggregate(files, &languages, &rules);
        assert_eq!(report.summary.languages_detected, ["python", "rust"]);
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let (languages, rules) = defaults();
        let files = vec![
            FileAnalysis::new("a.py", 10, vec![issue(Severity::High), issue(Severity::Low)]),
            FileAnalysis::new("b.rs", 2, vec![issue(Severity::Critical)]),
        ];

        let first = aggregate(files.clone(), &languages, &rules);
        let second = aggregate(files, &languages, &rules);

        // Byte-identical output, not just structural equality.
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_recommendations_derived_from_summary() {
        let (languages, rules) = defaults();
        let files = vec![FileAnalysis::new(
            "a.unknownext",
            10,
            vec![issue(Severity::High), issue(Severity::Low)],
        )];
        let report = aggregate(files, &languages, &rules);

        assert_eq!(report.recommendations.len(), 1);
        assert!(report.recommendations[0].contains("high-priority"));
        assert!(report.recommendations[0].contains('1'));
    }
}
