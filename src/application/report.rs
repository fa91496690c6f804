//! Per-template outcomes and the batch summary printed at the end of a run

use std::fmt;
use std::path::PathBuf;

/// Result of invoking one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// File written to this path
    Success(PathBuf),
    /// Resolution or generation failed
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub name: String,
    pub outcome: Outcome,
}

impl RunResult {
    pub fn success(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Success(path),
        }
    }

    pub fn failure(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Failure(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Success(path) => write!(f, "ok   {} -> {}", self.name, path.display()),
            Outcome::Failure(message) => write!(f, "FAIL {}: {}", self.name, message),
        }
    }
}

/// Ordered results of one run.
///
/// An empty report counts as failed: a generating run that attempted
/// nothing did not do what was asked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    results: Vec<RunResult>,
}

impl BatchReport {
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        !self.results.is_empty() && self.failed() == 0
    }

    /// Process exit status for this run
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }

    pub fn summary(&self) -> String {
        format!("{} succeeded, {} failed", self.succeeded(), self.failed())
    }

    /// Text printed at the end of a run.
    ///
    /// Quiet output keeps only the `FAIL` lines and the summary, and is empty
    /// when the run succeeded.
    pub fn render(&self, quiet: bool) -> String {
        if !quiet {
            return self.to_string();
        }
        if self.is_success() {
            return String::new();
        }
        let mut lines: Vec<String> = self
            .results
            .iter()
            .filter(|r| !r.is_success())
            .map(ToString::to_string)
            .collect();
        lines.push(self.summary());
        lines.join("\n")
    }
}

impl FromIterator<RunResult> for BatchReport {
    fn from_iter<I: IntoIterator<Item = RunResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(f, "{result}")?;
        }
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_lines() {
        let ok = RunResult::success("membership_form", PathBuf::from("out/membership_form.pdf"));
        assert_eq!(ok.to_string(), "ok   membership_form -> out/membership_form.pdf");

        let fail = RunResult::failure("broken", "Template broken failed: boom");
        assert_eq!(fail.to_string(), "FAIL broken: Template broken failed: boom");
    }

    #[test]
    fn test_counts_and_exit_code() {
        let report: BatchReport = vec![
            RunResult::success("a", PathBuf::from("out/a.pdf")),
            RunResult::failure("b", "boom"),
            RunResult::success("c", PathBuf::from("out/c.pdf")),
        ]
        .into_iter()
        .collect();

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.summary(), "2 succeeded, 1 failed");
    }

    #[test]
    fn test_all_success_exits_zero() {
        let report: BatchReport = std::iter::once(RunResult::success("a", PathBuf::from("a.pdf")))
            .collect();
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_empty_report_is_failure() {
        let report = BatchReport::default();
        assert!(!report.is_success());
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.to_string(), "0 succeeded, 0 failed");
    }

    #[test]
    fn test_display_preserves_order() {
        let report: BatchReport = vec![
            RunResult::failure("z", "boom"),
            RunResult::success("a", PathBuf::from("a.pdf")),
        ]
        .into_iter()
        .collect();
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["FAIL z: boom", "ok   a -> a.pdf", "1 succeeded, 1 failed"]
        );
    }

    #[test]
    fn test_quiet_render_keeps_only_failures() {
        let report: BatchReport = vec![
            RunResult::success("a", PathBuf::from("a.pdf")),
            RunResult::failure("b", "boom"),
        ]
        .into_iter()
        .collect();
        assert_eq!(report.render(true), "FAIL b: boom\n1 succeeded, 1 failed");
        assert_eq!(report.render(false), report.to_string());
    }

    #[test]
    fn test_quiet_render_of_clean_run_is_empty() {
        let report: BatchReport = vec![
            RunResult::success("a", PathBuf::from("a.pdf")),
            RunResult::success("b", PathBuf::from("b.pdf")),
        ]
        .into_iter()
        .collect();
        assert!(report.render(true).is_empty());

        // nothing attempted still reports
        assert_eq!(BatchReport::default().render(true), "0 succeeded, 0 failed");
    }
}
