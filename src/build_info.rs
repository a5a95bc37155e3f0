//! Build provenance compiled into the binary.
//!
//! `build.rs` records who built the binary, when, and with which toolchain.
//! [`BuildInfo`] renders that as a manifest-style block for `info` and
//! `--version`.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

/// Human-readable product name.
pub const TITLE: &str = "Excel Chart Generator";

/// Provenance of this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub title: &'static str,
    pub version: &'static str,
    pub built_by: &'static str,
    /// Unix seconds
    pub built_at: i64,
    pub rustc: &'static str,
    pub cargo: &'static str,
    pub profile: &'static str,
}

impl BuildInfo {
    /// Provenance of the running binary.
    pub fn current() -> Self {
        Self {
            title: TITLE,
            version: env!("CARGO_PKG_VERSION"),
            built_by: env!("ECG_BUILT_BY"),
            built_at: env!("ECG_BUILT_AT").parse().unwrap_or(0),
            rustc: env!("ECG_BUILT_RUSTC"),
            cargo: env!("ECG_BUILT_CARGO"),
            profile: env!("ECG_BUILT_PROFILE"),
        }
    }

    /// Build time, `None` when it was not recorded.
    pub fn built_date(&self) -> Option<DateTime<Utc>> {
        if self.built_at <= 0 {
            return None;
        }
        DateTime::from_timestamp(self.built_at, 0)
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Implementation-Title: {}", self.title)?;
        writeln!(f, "Implementation-Version: {}", self.version)?;
        writeln!(f, "Built-By: {}", self.built_by)?;
        match self.built_date() {
            Some(date) => writeln!(
                f,
                "Built-Date: {}",
                date.to_rfc3339_opts(SecondsFormat::Secs, true)
            )?,
            None => writeln!(f, "Built-Date: unknown")?,
        }
        writeln!(f, "Built-Rustc: {}", self.rustc)?;
        writeln!(f, "Created-By: {}", self.cargo)?;
        write!(f, "Build-Profile: {}", self.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current() {
        let info = BuildInfo::current();
        assert_eq!(info.title, "Excel Chart Generator");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert!(!info.built_by.is_empty());
        assert!(info.built_date().is_some());
    }

    #[test]
    fn test_display() {
        let info = BuildInfo {
            title: TITLE,
            version: "1.0.0",
            built_by: "ci",
            built_at: 1_700_000_000,
            rustc: "rustc 1.90.0",
            cargo: "cargo 1.90.0",
            profile: "release",
        };
        let text = info.to_string();
        assert!(text.starts_with("Implementation-Title: Excel Chart Generator\n"));
        assert!(text.contains("Implementation-Version: 1.0.0\n"));
        assert!(text.contains("Built-Date: 2023-11-14T22:13:20Z\n"));
        assert!(text.ends_with("Build-Profile: release"));

        let unknown = BuildInfo { built_at: 0, ..info };
        assert!(unknown.to_string().contains("Built-Date: unknown"));
    }
}
