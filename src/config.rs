use std::fmt;

/// Legacy placeholder some callers pass to mean "no author filter".
///
/// Older tooling used this literal instead of omitting the flag; it is
/// accepted as an input alias and normalized to `None`.
pub const SENTINEL_EMAIL: &str = "unknown@unknown.com";

/// Immutable configuration for a single analysis run.
#[derive(Clone)]
pub struct RunConfig {
    /// Azure DevOps organization name (the tenant under `dev.azure.com`).
    pub organization: String,
    /// Personal Access Token used for Basic auth.
    pub pat: String,
    /// Optional project-name filter (case-insensitive exact match).
    pub project: Option<String>,
    /// Trailing lookback window in days.
    pub days_back: u32,
    /// Optional author email for commit and work-item filtering.
    pub email: Option<String>,
    /// Whether to verify TLS certificates (disabled behind some corporate
    /// proxies).
    pub verify_ssl: bool,
}

impl RunConfig {
    /// Normalize an email argument: trims whitespace, and maps the empty
    /// string and the legacy sentinel to `None`.
    pub fn normalize_email(email: Option<String>) -> Option<String> {
        let email = email?;
        let trimmed = email.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(SENTINEL_EMAIL) {
            None
        } else {
            Some(trimmed.to_owned())
        }
    }
}

// The PAT must never end up in logs, so `Debug` is written by hand.
impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("organization", &self.organization)
            .field("pat", &"<redacted>")
            .field("project", &self.project)
            .field("days_back", &self.days_back)
            .field("email", &self.email)
            .field("verify_ssl", &self.verify_ssl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concrete_email_passes_through() {
        assert_eq!(
            RunConfig::normalize_email(Some("dev@example.com".into())),
            Some("dev@example.com".to_owned())
        );
    }

    #[test]
    fn absent_email_stays_absent() {
        assert_eq!(RunConfig::normalize_email(None), None);
    }

    #[test]
    fn sentinel_email_normalizes_to_none() {
        assert_eq!(
            RunConfig::normalize_email(Some("unknown@unknown.com".into())),
            None
        );
    }

    #[test]
    fn sentinel_email_is_case_insensitive() {
        assert_eq!(
            RunConfig::normalize_email(Some("Unknown@Unknown.COM".into())),
            None
        );
    }

    #[test]
    fn whitespace_only_email_normalizes_to_none() {
        assert_eq!(RunConfig::normalize_email(Some("   ".into())), None);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            RunConfig::normalize_email(Some("  dev@example.com ".into())),
            Some("dev@example.com".to_owned())
        );
    }

    #[test]
    fn debug_output_redacts_pat() {
        let config = RunConfig {
            organization: "contoso".into(),
            pat: "super-secret".into(),
            project: None,
            days_back: 90,
            email: None,
            verify_ssl: true,
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
