//! Version comparison for application update checks.
//!
//! Fetching release information is left to the caller; this module only decides whether a
//! check is due and whether a release is newer than the running version.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::VersionError;

/// Minimum time between two automatic update checks, in seconds
pub const CHECK_INTERVAL_SECS: i64 = 24 * 60 * 60;

/// Extensions of release assets which can be downloaded directly
const DOWNLOADABLE_ASSET_EXTENSIONS: [&str; 2] = [".exe", ".zip"];

/// A `major.minor.patch` version. Missing parts are treated as `0`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionError::Invalid(s.to_owned());
        let trimmed = s.trim().trim_start_matches(['v', 'V']);
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let parts = trimmed
            .split('.')
            .map(|part| part.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        match parts[..] {
            [major] => Ok(Self::new(major, 0, 0)),
            [major, minor] => Ok(Self::new(major, minor, 0)),
            [major, minor, patch] => Ok(Self::new(major, minor, patch)),
            _ => Err(invalid()),
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Returns true if `remote` is a newer version than `current`. Unparsable versions are never
/// newer
pub fn is_newer(remote: &str, current: &str) -> bool {
    match (remote.parse::<Version>(), current.parse::<Version>()) {
        (Ok(remote), Ok(current)) => remote > current,
        (remote, current) => {
            debug!("Could not compare versions: {remote:?}, {current:?}");
            false
        }
    }
}

/// Returns true if enough time has passed since the last update check
pub fn should_check(last_check: i64, now: i64) -> bool {
    now.saturating_sub(last_check) > CHECK_INTERVAL_SECS
}

/// Information about a release newer than the running version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateInfo {
    pub version: String,
    pub changelog: String,
    /// Release page
    pub url: String,
    pub published: String,
    /// Direct download of the first `.exe` or `.zip` asset, or the release page if there is none
    pub download_url: String,
}

impl UpdateInfo {
    /// Reads a GitHub-style release object, returning the update information only if the
    /// release is newer than `current`
    pub fn from_release_json(release: &Value, current: &str) -> Option<Self> {
        let as_string = |key: &str| release[key].as_str().unwrap_or_default().to_owned();

        let tag = release["tag_name"].as_str()?;
        let version = tag.trim().trim_start_matches(['v', 'V']).to_owned();
        if !is_newer(&version, current) {
            return None;
        }

        let url = as_string("html_url");
        let download_url = release["assets"]
            .as_array()
            .into_iter()
            .flatten()
            .find(|asset| {
                let name = asset["name"].as_str().unwrap_or_default().to_lowercase();
                DOWNLOADABLE_ASSET_EXTENSIONS
                    .iter()
                    .any(|ext| name.ends_with(ext))
            })
            .and_then(|asset| asset["browser_download_url"].as_str())
            .map_or_else(|| url.clone(), str::to_owned);

        let changelog = release["body"]
            .as_str()
            .filter(|body| !body.trim().is_empty())
            .unwrap_or("No description available")
            .to_owned();

        Some(Self {
            version,
            changelog,
            url,
            published: as_string("published_at"),
            download_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    use super::*;

    #[test_case("2.1.0", Ok(Version::new(2, 1, 0)))]
    #[test_case("v3.0.12", Ok(Version::new(3, 0, 12)))]
    #[test_case("2.1", Ok(Version::new(2, 1, 0)))]
    #[test_case("7", Ok(Version::new(7, 0, 0)))]
    #[test_case("2.x.0", Err(VersionError::Invalid("2.x.0".to_owned())))]
    #[test_case("1.2.3.4", Err(VersionError::Invalid("1.2.3.4".to_owned())))]
    #[test_case("", Err(VersionError::Invalid("".to_owned())))]
    fn test_parse_version(input: &str, expected: Result<Version, VersionError>) {
        assert_eq!(input.parse::<Version>(), expected);
    }

    #[test_case("2.1.0", "2.0.0", true)]
    #[test_case("2.0.1", "2.0.0", true)]
    #[test_case("2.10.0", "2.9.9", true)]
    #[test_case("2.0", "2.0.0", false)]
    #[test_case("1.9.9", "2.0.0", false)]
    #[test_case("beta", "2.0.0", false)]
    fn test_is_newer(remote: &str, current: &str, expected: bool) {
        assert_eq!(is_newer(remote, current), expected);
    }

    #[test_case(0, 1_700_000_000, true)]
    #[test_case(1_700_000_000, 1_700_000_000 + CHECK_INTERVAL_SECS, false)]
    #[test_case(1_700_000_000, 1_700_000_001 + CHECK_INTERVAL_SECS, true)]
    fn test_should_check(last_check: i64, now: i64, expected: bool) {
        assert_eq!(should_check(last_check, now), expected);
    }

    #[test]
    fn test_update_info_from_newer_release() {
        let release = json!({
            "tag_name": "v2.1.0",
            "body": "Faster library loading",
            "html_url": "https://example.com/releases/v2.1.0",
            "published_at": "2024-05-01T12:00:00Z",
            "assets": [
                { "name": "checksums.txt", "browser_download_url": "https://example.com/sums" },
                { "name": "Launcher-2.1.0.ZIP", "browser_download_url": "https://example.com/zip" }
            ]
        });

        let info = UpdateInfo::from_release_json(&release, "2.0.0").unwrap();

        assert_eq!(
            info,
            UpdateInfo {
                version: "2.1.0".to_owned(),
                changelog: "Faster library loading".to_owned(),
                url: "https://example.com/releases/v2.1.0".to_owned(),
                published: "2024-05-01T12:00:00Z".to_owned(),
                download_url: "https://example.com/zip".to_owned(),
            }
        );
    }

    #[test]
    fn test_update_info_without_assets() {
        let release = json!({ "tag_name": "3.0.0", "html_url": "https://example.com/r" });

        let info = UpdateInfo::from_release_json(&release, "2.0.0").unwrap();

        assert_eq!(info.download_url, "https://example.com/r");
        assert_eq!(info.changelog, "No description available");
    }

    #[test_case(json!({ "tag_name": "v2.0.0" }); "same version")]
    #[test_case(json!({ "tag_name": "1.0.0" }); "older version")]
    #[test_case(json!({ "message": "Not Found" }); "no tag")]
    fn test_update_info_not_newer(release: Value) {
        assert_eq!(UpdateInfo::from_release_json(&release, "2.0.0"), None);
    }
}
