//! Per-section restore outcomes
//!
//! Restore is best effort: each section is an independent step whose outcome
//! is accumulated here instead of aborting the remaining steps.

use std::fmt;

use super::options::Section;

/// What happened to one section during a restore
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionOutcome {
    /// The caller did not ask for this section
    NotRequested,
    /// Requested, but the document holds no records for it
    Empty,
    /// Records were processed; individual records may have been skipped or failed
    Applied {
        applied: usize,
        skipped: usize,
        failed: usize,
    },
    /// The section as a whole could not be restored
    Failed(String),
}

impl SectionOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for SectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRequested => write!(f, "not requested"),
            Self::Empty => write!(f, "nothing to restore"),
            Self::Applied {
                applied,
                skipped,
                failed,
            } => {
                write!(f, "{} applied", applied)?;
                if *skipped > 0 {
                    write!(f, ", {} skipped", skipped)?;
                }
                if *failed > 0 {
                    write!(f, ", {} failed", failed)?;
                }
                Ok(())
            }
            Self::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// Outcomes of every restore step, in the order they ran
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    steps: Vec<(Section, SectionOutcome)>,
}

impl RestoreReport {
    pub fn record(&mut self, section: Section, outcome: SectionOutcome) {
        self.steps.push((section, outcome));
    }

    /// Mark a section as failed after its step ran, replacing the recorded outcome
    pub fn record_failure(&mut self, section: Section, reason: impl Into<String>) {
        let outcome = SectionOutcome::Failed(reason.into());
        match self.steps.iter_mut().find(|(s, _)| *s == section) {
            Some((_, slot)) => *slot = outcome,
            None => self.steps.push((section, outcome)),
        }
    }

    pub fn outcome(&self, section: Section) -> Option<&SectionOutcome> {
        self.steps
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, outcome)| outcome)
    }

    pub fn steps(&self) -> &[(Section, SectionOutcome)] {
        &self.steps
    }

    /// True when no section failed outright and no record failed
    pub fn is_clean(&self) -> bool {
        self.steps.iter().all(|(_, outcome)| match outcome {
            SectionOutcome::Failed(_) => false,
            SectionOutcome::Applied { failed, .. } => *failed == 0,
            _ => true,
        })
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .steps
            .iter()
            .filter(|(_, outcome)| *outcome != SectionOutcome::NotRequested)
            .map(|(section, outcome)| format!("{}: {}", section, outcome))
            .collect();

        if parts.is_empty() {
            "Nothing restored".to_string()
        } else {
            format!("Restored {}", parts.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let mut report = RestoreReport::default();
        report.record(Section::Settings, SectionOutcome::NotRequested);
        report.record(
            Section::Domains,
            SectionOutcome::Applied {
                applied: 3,
                skipped: 0,
                failed: 1,
            },
        );
        report.record(
            Section::Applications,
            SectionOutcome::Applied {
                applied: 1,
                skipped: 2,
                failed: 0,
            },
        );

        assert_eq!(
            report.summary(),
            "Restored domains: 3 applied, 1 failed; applications: 1 applied, 2 skipped"
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn test_empty_report() {
        let report = RestoreReport::default();
        assert_eq!(report.summary(), "Nothing restored");
        assert!(report.is_clean());
    }

    #[test]
    fn test_outcome_lookup() {
        let mut report = RestoreReport::default();
        report.record(Section::Blocklists, SectionOutcome::Failed("disk full".into()));

        assert!(report.outcome(Section::Blocklists).unwrap().is_failed());
        assert!(report.outcome(Section::Settings).is_none());
        assert_eq!(
            report.outcome(Section::Blocklists).unwrap().to_string(),
            "failed (disk full)"
        );
    }

    #[test]
    fn test_record_failure_replaces_outcome() {
        let mut report = RestoreReport::default();
        report.record(
            Section::Settings,
            SectionOutcome::Applied {
                applied: 1,
                skipped: 0,
                failed: 0,
            },
        );
        report.record(Section::Domains, SectionOutcome::Empty);

        report.record_failure(Section::Settings, "read-only file system");
        report.record_failure(Section::Applications, "registry offline");

        assert_eq!(report.steps().len(), 3);
        assert_eq!(report.steps()[0].0, Section::Settings);
        assert_eq!(
            report.outcome(Section::Settings),
            Some(&SectionOutcome::Failed("read-only file system".into()))
        );
        assert_eq!(report.outcome(Section::Domains), Some(&SectionOutcome::Empty));
        assert!(report.outcome(Section::Applications).unwrap().is_failed());
        assert!(!report.is_clean());
    }
}
