//! Output formatting for the `healthcheck` commands.
//!
//! Reports go to stdout in human-readable or JSON form; progress and errors
//! go to stderr through [`write_stderr_line`].

use healthcheck::hotfix::{Assessment, HotfixableRelease, RemediationArtifact};
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// Outcome of checking one platform version against the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotfixReport {
    /// The version as given on the command line.
    pub platform_version: String,
    /// Whether a hotfix must be applied.
    pub required: bool,
    /// Where the version falls relative to the catalogue.
    pub status: HotfixStatus,
    /// Release needing the hotfix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<HotfixableRelease>,
    /// UUID of the hotfix to apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Filename of the hotfix to apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Status column of a [`HotfixReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HotfixStatus {
    /// A hotfix applies.
    Hotfixable,
    /// The host is at or above the up-to-date ceiling.
    UpToDate,
    /// The host is older than every catalogued release.
    PredatesCatalogue,
}

impl HotfixReport {
    /// Build a report from an assessment and the artifact it resolved to.
    #[must_use]
    pub fn new(
        platform_version: &str,
        assessment: Assessment,
        artifact: Option<&RemediationArtifact>,
    ) -> Self {
        let status = match assessment {
            Assessment::Hotfixable(_) => HotfixStatus::Hotfixable,
            Assessment::UpToDate => HotfixStatus::UpToDate,
            Assessment::PredatesCatalogue => HotfixStatus::PredatesCatalogue,
        };
        Self {
            platform_version: platform_version.trim().to_owned(),
            required: artifact.is_some(),
            status,
            release: assessment.release(),
            uuid: artifact.map(|a| a.uuid().to_string()),
            filename: artifact.map(|a| a.filename().to_owned()),
        }
    }
}

/// Format a hotfix report for a person reading a terminal.
///
/// # Examples
///
/// ```
/// use healthcheck::hotfix::Assessment;
/// use healthcheck_callhome::output::{HotfixReport, format_human};
///
/// let report = HotfixReport::new("2.5.50", Assessment::UpToDate, None);
/// assert!(format_human(&report).contains("up to date"));
/// ```
#[must_use]
pub fn format_human(report: &HotfixReport) -> String {
    let version = &report.platform_version;
    match (report.status, &report.release, &report.uuid, &report.filename) {
        (HotfixStatus::Hotfixable, Some(release), Some(uuid), Some(filename)) => format!(
            "Platform version {version} ({release}) requires hotfix {filename}\n  UUID: {uuid}"
        ),
        (HotfixStatus::PredatesCatalogue, ..) => format!(
            "Platform version {version} predates every catalogued release; no hotfix applies"
        ),
        _ => format!("Platform version {version} is up to date; no hotfix required"),
    }
}

/// Format a hotfix report as pretty-printed JSON.
#[must_use]
pub fn format_json(report: &HotfixReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_owned())
}

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort; nowhere left to report the failure.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthcheck::hotfix::HotfixCatalogue;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    #[fixture]
    fn catalogue() -> HotfixCatalogue {
        HotfixCatalogue::builtin().expect("built-in catalogue is valid")
    }

    fn report_for(catalogue: &HotfixCatalogue, version: &str) -> HotfixReport {
        let assessment = catalogue.assess(version).expect("valid version");
        let artifact = catalogue.resolve(version).expect("valid version");
        HotfixReport::new(version, assessment, artifact)
    }

    #[rstest]
    fn hotfixable_report_names_the_artifact(catalogue: HotfixCatalogue) {
        let report = report_for(&catalogue, "2.1.1");

        assert!(report.required);
        assert_eq!(report.filename.as_deref(), Some("RPU004"));
        let text = format_human(&report);
        assert!(text.contains("Ely-Jura"), "got {text}");
        assert!(text.contains("1821854d-0171-4696-a9c4-01daf75a45a0"));
    }

    #[rstest]
    #[case::up_to_date("2.5.50", "up to date")]
    #[case::predates("1.7.9", "predates")]
    fn reports_without_hotfix(
        catalogue: HotfixCatalogue,
        #[case] version: &str,
        #[case] phrase: &str,
    ) {
        let report = report_for(&catalogue, version);

        assert!(!report.required);
        assert!(report.uuid.is_none());
        assert!(format_human(&report).contains(phrase));
    }

    #[rstest]
    #[case::creedence(
        " 1.9.0 ",
        "1.9.0",
        "Creedence",
        "9adf434f-05b6-4c49-bf87-3447b5eb7850",
        "RPU002"
    )]
    #[case::ely_jura(
        "2.1.1",
        "2.1.1",
        "Ely-Jura",
        "1821854d-0171-4696-a9c4-01daf75a45a0",
        "RPU004"
    )]
    fn json_report_includes_artifact_fields(
        catalogue: HotfixCatalogue,
        #[case] input: &str,
        #[case] version: &str,
        #[case] release: &str,
        #[case] uuid: &str,
        #[case] filename: &str,
    ) {
        let report = report_for(&catalogue, input);

        let parsed: Value = serde_json::from_str(&format_json(&report)).expect("valid JSON");

        assert_eq!(
            parsed,
            json!({
                "platform_version": version,
                "required": true,
                "status": "hotfixable",
                "release": release,
                "uuid": uuid,
                "filename": filename,
            })
        );
    }

    #[rstest]
    fn json_report_omits_absent_fields(catalogue: HotfixCatalogue) {
        let report = report_for(&catalogue, "9999.9999.9999");

        let parsed: Value = serde_json::from_str(&format_json(&report)).expect("valid JSON");

        assert_eq!(
            parsed,
            json!({
                "platform_version": "9999.9999.9999",
                "required": false,
                "status": "up-to-date",
            })
        );
    }

    #[test]
    fn write_stderr_line_appends_newline() {
        let mut stderr = Vec::new();
        write_stderr_line(&mut stderr, "hello");
        assert_eq!(stderr, b"hello\n");
    }
}
