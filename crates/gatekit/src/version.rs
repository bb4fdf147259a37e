//! Build metadata reporting.

use serde::Serialize;

/// Build metadata, populated once at startup and then only read.
///
/// Usually created with [`build_info!`](crate::build_info), which reads the
/// calling crate's version plus the optional `GIT_REVISION`, `GIT_BRANCH`,
/// `BUILD_USER`, `BUILD_DATE` and `RUSTC_VERSION` compile-time variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: String,
    pub revision: String,
    pub branch: String,
    pub build_user: String,
    pub build_date: String,
    pub rust_version: String,
}

impl BuildInfo {
    /// One-line summary: `(version=.., branch=.., revision=..)`.
    pub fn info(&self) -> String {
        format!(
            "(version={}, branch={}, revision={})",
            self.version, self.branch, self.revision
        )
    }

    /// One-line build environment: `(rust=.., user=.., date=..)`.
    pub fn build_context(&self) -> String {
        format!(
            "(rust={}, user={}, date={})",
            self.rust_version, self.build_user, self.build_date
        )
    }

    /// Multi-line report suitable for a `--version` flag.
    pub fn print(&self, program: &str) -> String {
        format!(
            "{program}, version {} (branch: {}, revision: {})\n  \
             build user:       {}\n  \
             build date:       {}\n  \
             rust version:     {}",
            self.version,
            self.branch,
            self.revision,
            self.build_user,
            self.build_date,
            self.rust_version,
        )
    }
}

/// Captures [`BuildInfo`] for the crate invoking the macro.
#[macro_export]
macro_rules! build_info {
    () => {
        $crate::BuildInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            revision: option_env!("GIT_REVISION").unwrap_or("unknown").to_string(),
            branch: option_env!("GIT_BRANCH").unwrap_or("unknown").to_string(),
            build_user: option_env!("BUILD_USER").unwrap_or("unknown").to_string(),
            build_date: option_env!("BUILD_DATE").unwrap_or("unknown").to_string(),
            rust_version: option_env!("RUSTC_VERSION").unwrap_or("unknown").to_string(),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BuildInfo {
        BuildInfo {
            version: "1.0.0".to_string(),
            revision: "4819e09c01edbb4d8bf019765b4d65cd254f34a5".to_string(),
            branch: "master".to_string(),
            build_user: "builder".to_string(),
            build_date: "2019-01-01@12:00:00".to_string(),
            rust_version: "1.80.0".to_string(),
        }
    }

    #[test]
    fn info_format() {
        assert_eq!(
            sample().info(),
            "(version=1.0.0, branch=master, revision=4819e09c01edbb4d8bf019765b4d65cd254f34a5)"
        );
    }

    #[test]
    fn build_context_format() {
        assert_eq!(
            sample().build_context(),
            "(rust=1.80.0, user=builder, date=2019-01-01@12:00:00)"
        );
    }

    #[test]
    fn print_includes_program_and_fields() {
        let report = sample().print("myapp");
        assert!(report.starts_with("myapp, version 1.0.0 (branch: master, revision: 4819e09c"));
        assert!(report.contains("build user:       builder"));
        assert!(report.contains("rust version:     1.80.0"));
    }

    #[test]
    fn macro_uses_package_version() {
        let info = crate::build_info!();
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }
}
