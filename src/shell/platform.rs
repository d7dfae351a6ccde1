//! Platform checks.

/// Variables set by common CI providers.
const CI_VARS: [&str; 6] = [
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

/// Check if running in a CI environment.
///
/// Used to force the plain, non-interactive UI in `main()`.
pub fn is_ci() -> bool {
    is_ci_with_env(|key| std::env::var(key))
}

/// Check for CI with a custom env var lookup (for testing).
pub fn is_ci_with_env<F>(env_fn: F) -> bool
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    CI_VARS.iter().any(|&var| env_fn(var).is_ok())
}

/// Check if running as root.
///
/// When true, escalating a denied filesystem call through `sudo` cannot
/// help, so the escalation step is skipped.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}
