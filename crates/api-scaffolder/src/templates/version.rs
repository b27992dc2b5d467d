//! Version comparison for CLI and template compatibility

use semver::Version;

/// Compare CLI version against the minimum version a template asks for.
/// Returns a warning message if the CLI is older than the template expects.
pub fn check_compatibility(
    cli_version: &str,
    template_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    let cli_ver = parse_version(cli_version)?;
    // Unparseable versions can't be compared; skip the warning
    let template_ver = parse_version(template_version)?;

    if cli_ver < template_ver {
        Some(format!(
            "This template was designed for CLI version {} or newer.\n\
             You are running version {}.\n\
             Consider updating: {}",
            template_ver, cli_ver, upgrade_command
        ))
    } else {
        None
    }
}

/// Parse a version string, tolerating a leading `v`
fn parse_version(version_str: &str) -> Option<Version> {
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).ok()
}
