//! Heuristic line-scan strategy.
//!
//! The built-in [`AnalysisStrategy`]: fast, dependency-free pattern
//! checks over the analyzed text, covering four categories — style,
//! potential bugs, performance, and security. Line numbers are 1-based
//! positions within the analyzed content (the patch when present,
//! otherwise the full file).

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use revu_core::{AnalysisStrategy, ChangedFile, Issue, Result, Severity};

const MAX_LINE_LENGTH: usize = 120;

/// Identifier-like tokens that suggest a hardcoded credential when
/// assigned a string literal.
const SECRET_TOKENS: &[&str] = &["password", "secret", "api_key", "token", "key"];

static SECRET_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    // e.g. `password = "hunter2"` or `API_KEY: 'abc'`
    Regex::new(r#"(?i)\b(password|secret|api_key|token|key)\b\s*[:=]\s*["'][^"']+["']"#)
        .expect("secret assignment pattern is valid")
});

static SQL_SELECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bselect\b.*\bfrom\b").expect("sql select pattern is valid")
});

/// The built-in heuristic reviewer.
#[derive(Debug, Default, Clone)]
pub struct HeuristicStrategy;

impl HeuristicStrategy {
    pub const NAME: &'static str = "heuristic";

    pub fn new() -> Self {
        Self
    }

    fn issue(
        kind: &str,
        line: u32,
        severity: Severity,
        description: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Issue {
        Issue {
            kind: kind.to_string(),
            line,
            description: description.into(),
            suggestion: suggestion.into(),
            severity,
        }
    }

    fn check_style(issues: &mut Vec<Issue>, lines: &[&str], language: Option<&str>) {
        for (i, line) in lines.iter().enumerate() {
            let line_no = (i + 1) as u32;

            if line.len() > MAX_LINE_LENGTH {
                issues.push(Self::issue(
                    Issue::KIND_STYLE,
                    line_no,
                    Severity::Low,
                    format!("Line too long ({} characters)", line.len()),
                    "Break line into multiple lines or refactor",
                ));
            }

            if line.ends_with(' ') || line.ends_with('\t') {
                issues.push(Self::issue(
                    Issue::KIND_STYLE,
                    line_no,
                    Severity::Low,
                    "Trailing whitespace detected",
                    "Remove trailing whitespace",
                ));
            }

            if language == Some("python") && line.trim_start().starts_with("def ") {
                let next = lines.get(i + 1).map(|l| l.trim_start()).unwrap_or("");
                if !next.starts_with("\"\"\"") && !next.starts_with("'''") {
                    issues.push(Self::issue(
                        Issue::KIND_STYLE,
                        line_no,
                        Severity::Medium,
                        "Function missing docstring",
                        "Add a docstring documenting the function's purpose",
                    ));
                }
            }
        }
    }

    fn check_bugs(issues: &mut Vec<Issue>, lines: &[&str], language: Option<&str>) {
        for (i, line) in lines.iter().enumerate() {
            let line_no = (i + 1) as u32;
            let trimmed = line.trim();

            match language {
                Some("python") => {
                    if trimmed == "except:" {
                        issues.push(Self::issue(
                            Issue::KIND_BUG,
                            line_no,
                            Severity::High,
                            "Bare except clause catches all exceptions",
                            "Specify the exception types to catch",
                        ));
                    }
                    if line.contains(".get(") && !line.contains("if") && !line.contains("assert") {
                        issues.push(Self::issue(
                            Issue::KIND_BUG,
                            line_no,
                            Severity::Medium,
                            "Potential None value from dict.get() without a check",
                            "Add a None check or provide a default value",
                        ));
                    }
                }
                Some("javascript") | Some("typescript") => {
                    if line.contains(" == ") && !line.contains(" === ") {
                        issues.push(Self::issue(
                            Issue::KIND_BUG,
                            line_no,
                            Severity::Medium,
                            "Using == instead of === for comparison",
                            "Use === for strict equality comparison",
                        ));
                    }
                    if line.contains(".length") && !line.contains("if") {
                        issues.push(Self::issue(
                            Issue::KIND_BUG,
                            line_no,
                            Severity::Medium,
                            "Accessing .length without a null/undefined check",
                            "Check for null/undefined before accessing length",
                        ));
                    }
                }
                _ => {}
            }
        }
    }

    fn check_performance(issues: &mut Vec<Issue>, lines: &[&str], language: Option<&str>) {
        for (i, line) in lines.iter().enumerate() {
            let line_no = (i + 1) as u32;

            // A loop with another loop within five lines either way reads
            // as nested iteration.
            if line.contains("for ") {
                let window_start = i.saturating_sub(5);
                let window_end = (i + 5).min(lines.len());
                let nearby_loop = (window_start..window_end)
                    .filter(|j| *j != i)
                    .any(|j| lines[j].contains("for "));
                if nearby_loop {
                    issues.push(Self::issue(
                        Issue::KIND_PERFORMANCE,
                        line_no,
                        Severity::Medium,
                        "Nested loops detected - potential O(n^2) complexity",
                        "Consider a more efficient algorithm or data structure",
                    ));
                }
            }

            if language == Some("python")
                && (line.contains("for ") || line.contains("while "))
                && line.contains("+=")
                && line.contains("str")
            {
                issues.push(Self::issue(
                    Issue::KIND_PERFORMANCE,
                    line_no,
                    Severity::Medium,
                    "String concatenation in a loop is inefficient",
                    "Use join() or f-strings instead",
                ));
            }
        }
    }

    fn check_security(issues: &mut Vec<Issue>, lines: &[&str]) {
        for (i, line) in lines.iter().enumerate() {
            let line_no = (i + 1) as u32;
            let lowered = line.to_lowercase();

            if SQL_SELECT.is_match(&lowered)
                && (lowered.contains("format") || lowered.contains('%') || lowered.contains('+'))
            {
                issues.push(Self::issue(
                    Issue::KIND_SECURITY,
                    line_no,
                    Severity::Critical,
                    "Potential SQL injection vulnerability",
                    "Use parameterized queries or prepared statements",
                ));
            }

            if SECRET_ASSIGNMENT.is_match(line) {
                let token = SECRET_TOKENS
                    .iter()
                    .find(|t| lowered.contains(*t))
                    .unwrap_or(&"secret");
                issues.push(Self::issue(
                    Issue::KIND_SECURITY,
                    line_no,
                    Severity::High,
                    format!("Potential hardcoded {} detected", token),
                    "Move sensitive data to environment variables or secure configuration",
                ));
            }

            if lowered.contains("eval(") {
                issues.push(Self::issue(
                    Issue::KIND_SECURITY,
                    line_no,
                    Severity::Critical,
                    "Use of eval() is dangerous",
                    "Avoid eval() and use a safer alternative",
                ));
            }
        }
    }
}

#[async_trait]
impl AnalysisStrategy for HeuristicStrategy {
    async fn analyze(&self, file: &ChangedFile, language: Option<&str>) -> Result<Vec<Issue>> {
        let content = file.analyzed_content();
        let lines: Vec<&str> = content.lines().collect();

        tracing::debug!(
            path = %file.path,
            language = language.unwrap_or("unknown"),
            lines = lines.len(),
            "running heuristic scan"
        );

        let mut issues = Vec::new();
        Self::check_style(&mut issues, &lines, language);
        Self::check_bugs(&mut issues, &lines, language);
        Self::check_performance(&mut issues, &lines, language);
        Self::check_security(&mut issues, &lines);
        Ok(issues)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
