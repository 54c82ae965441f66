//! Output suppression policy.

/// Tri-state output policy, derived once at startup and immutable for the
/// duration of one harness invocation.
///
/// `TerminalOnly` disables the per-run output directory and per-run log
/// redirection; the aggregate report artifacts are still written (relative
/// to the working directory). Only `Suppressed` disables report writing as
/// well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputPolicy {
    /// No output anywhere: no files, no terminal.
    Suppressed,
    /// No files; terminal/log output allowed.
    TerminalOnly,
    /// Files and terminal.
    Full,
}

impl OutputPolicy {
    /// Derive the policy from the two command-line flags. Full suppression
    /// wins over file suppression.
    pub fn from_flags(no_output: bool, no_files: bool) -> Self {
        if no_output {
            Self::Suppressed
        } else if no_files {
            Self::TerminalOnly
        } else {
            Self::Full
        }
    }

    /// Whether per-run directories and file output are enabled.
    pub fn files_enabled(&self) -> bool {
        matches!(self, Self::Full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(OutputPolicy::from_flags(false, false), OutputPolicy::Full);
        assert_eq!(
            OutputPolicy::from_flags(false, true),
            OutputPolicy::TerminalOnly
        );
        assert_eq!(
            OutputPolicy::from_flags(true, false),
            OutputPolicy::Suppressed
        );
        // Suppression wins when both are set.
        assert_eq!(
            OutputPolicy::from_flags(true, true),
            OutputPolicy::Suppressed
        );
    }

    #[test]
    fn test_files_enabled_only_for_full() {
        assert!(OutputPolicy::Full.files_enabled());
        assert!(!OutputPolicy::TerminalOnly.files_enabled());
        assert!(!OutputPolicy::Suppressed.files_enabled());
    }
}
