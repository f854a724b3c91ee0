//! Input Selector
//!
//! Finds the boundary, LAD and scenario files in the input folders.
//! Listing order is whatever the filesystem returns; nothing is sorted.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{DataPrepError, Result};

/// Files with an extension, as staged by the upstream uploader
pub const INPUT_PATTERN: &str = "*.*";

/// A candidate input file and the token used to match it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub path: PathBuf,
    /// File name without directory and without its last extension
    pub token: String,
    /// Same stem with the original bytes, used for destination names
    pub stem: OsString,
}

impl FileRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let token = file_token(&path);
        let stem = path.file_stem().map(|s| s.to_os_string()).unwrap_or_default();
        Self { path, token, stem }
    }
}

pub fn file_token(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Translate a file-name glob (`*`, `?`) into an anchored regex.
pub fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let escaped = regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");
    Regex::new(&format!("^{}$", escaped)).map_err(|e| DataPrepError::InvalidArgument {
        name: "pattern",
        message: format!("'{}': {}", pattern, e),
    })
}

/// Regular files in `dir` whose name matches `pattern`, in listing order.
///
/// Hidden files (leading `.`) only match a pattern that itself starts with `.`.
pub fn list_matches(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = glob_to_regex(pattern)?;
    let include_hidden = pattern.starts_with('.');

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(DataPrepError::MissingInput {
                dir: dir.to_path_buf(),
                pattern: pattern.to_string(),
            })
        }
        Err(e) => return Err(DataPrepError::fs("listing", dir, e)),
    };

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DataPrepError::fs("listing", dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') && !include_hidden {
            continue;
        }
        if matcher.is_match(&name) {
            matches.push(path);
        }
    }
    debug!(dir = %dir.display(), pattern, count = matches.len(), "Listed input candidates");
    Ok(matches)
}

/// The one input file expected in `dir`.
///
/// Takes the first match; extra matches are logged and ignored.
pub fn select_single(dir: &Path, pattern: &str) -> Result<PathBuf> {
    let mut matches = list_matches(dir, pattern)?.into_iter();
    let first = matches.next().ok_or_else(|| DataPrepError::MissingInput {
        dir: dir.to_path_buf(),
        pattern: pattern.to_string(),
    })?;

    let ignored: Vec<String> = matches.map(|p| p.display().to_string()).collect();
    if !ignored.is_empty() {
        warn!(
            "⚠️  {} holds {} extra input file(s); using {} and ignoring {:?}",
            dir.display(),
            ignored.len(),
            first.display(),
            ignored
        );
    }
    Ok(first)
}

/// Pick the candidate whose token contains `scenario`.
///
/// When several match, the last one in listing order wins.
pub fn pick_scenario<'a>(candidates: &'a [FileRef], scenario: &str) -> Option<&'a FileRef> {
    candidates.iter().filter(|c| c.token.contains(scenario)).last()
}

/// Scenario file for `scenario` among the files in `dir`.
pub fn select_scenario(dir: &Path, scenario: &str) -> Result<FileRef> {
    let candidates: Vec<FileRef> = list_matches(dir, INPUT_PATTERN)?
        .into_iter()
        .map(FileRef::new)
        .collect();
    debug!(?candidates, "Scenario candidates");

    let matching = candidates.iter().filter(|c| c.token.contains(scenario)).count();
    if matching > 1 {
        warn!(
            "⚠️  {} scenario files contain '{}'; the last one listed is used",
            matching, scenario
        );
    }

    pick_scenario(&candidates, scenario)
        .cloned()
        .ok_or_else(|| DataPrepError::ScenarioNotFound {
            dir: dir.to_path_buf(),
            scenario: scenario.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, name.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_glob_translation() {
        let re = glob_to_regex("*.*").unwrap();
        assert!(re.is_match("Kenya.gpkg"));
        assert!(re.is_match("a.b.c"));
        assert!(!re.is_match("README"));

        let re = glob_to_regex("ssp?_*.zip").unwrap();
        assert!(re.is_match("ssp2_2050.zip"));
        assert!(!re.is_match("ssp2_2050.zip.bak"));
        assert!(!re.is_match("xssp2_2050.zip"));

        // regex metacharacters in the pattern are literal
        assert!(glob_to_regex("(a+).txt").unwrap().is_match("(a+).txt"));
    }

    #[test]
    fn test_file_token() {
        assert_eq!(file_token(Path::new("/in/ssps/region_ssp2_2050.zip")), "region_ssp2_2050");
        assert_eq!(file_token(Path::new("data.tar.gz")), "data.tar");
        assert_eq!(FileRef::new("x/y.gpkg").token, "y");
    }

    #[test]
    fn test_list_skips_dirs_and_extensionless() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "Kenya.gpkg");
        touch(dir.path(), "README");
        fs::create_dir(dir.path().join("nested.d")).unwrap();
        let found = list_matches(dir.path(), INPUT_PATTERN).unwrap();
        assert_eq!(found, vec![dir.path().join("Kenya.gpkg")]);
    }

    #[test]
    fn test_hidden_files_are_skipped() {
        let dir = tempdir().unwrap();
        touch(dir.path(), ".DS_Store");
        let err = select_single(dir.path(), INPUT_PATTERN).unwrap_err();
        assert!(matches!(err, DataPrepError::MissingInput { .. }));

        // an explicit dot pattern still reaches them
        let found = list_matches(dir.path(), ".*").unwrap();
        assert_eq!(found, vec![dir.path().join(".DS_Store")]);
    }

    #[test]
    fn test_appledouble_sidecar_never_wins_scenario() {
        let dir = tempdir().unwrap();
        let wanted = touch(dir.path(), "region_ssp2_2050.zip");
        touch(dir.path(), "._region_ssp2_2050.zip");
        let picked = select_scenario(dir.path(), "ssp2").unwrap();
        assert_eq!(picked.path, wanted);
        assert_eq!(picked.token, "region_ssp2_2050");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_stem_kept_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"region_ssp2_\xff2050.zip");
        let file = FileRef::new(Path::new("/in").join(name));
        assert_eq!(file.stem, OsStr::from_bytes(b"region_ssp2_\xff2050"));
        assert!(file.token.contains("ssp2"));
    }

    #[test]
    fn test_select_single_missing() {
        let dir = tempdir().unwrap();
        let err = select_single(dir.path(), INPUT_PATTERN).unwrap_err();
        assert!(matches!(err, DataPrepError::MissingInput { .. }));

        let err = select_single(&dir.path().join("absent"), INPUT_PATTERN).unwrap_err();
        assert!(err.is_missing_input());
        assert!(err.to_string().contains("absent"));
    }

    #[test]
    fn test_select_single_takes_a_listed_file() {
        let dir = tempdir().unwrap();
        let a = touch(dir.path(), "a.gpkg");
        let b = touch(dir.path(), "b.gpkg");
        let chosen = select_single(dir.path(), INPUT_PATTERN).unwrap();
        let listed = list_matches(dir.path(), INPUT_PATTERN).unwrap();
        assert_eq!(chosen, listed[0]);
        assert!(chosen == a || chosen == b);
    }

    #[test]
    fn test_pick_scenario_substring() {
        let candidates = vec![
            FileRef::new("in/region_ssp1_2030.zip"),
            FileRef::new("in/region_ssp2_2050.zip"),
        ];
        let picked = pick_scenario(&candidates, "ssp2").unwrap();
        assert_eq!(picked.token, "region_ssp2_2050");
        assert!(pick_scenario(&candidates, "ssp5").is_none());
    }

    #[test]
    fn test_pick_scenario_last_match_wins() {
        let candidates = vec![
            FileRef::new("in/ssp2_2030.zip"),
            FileRef::new("in/ssp1_2030.zip"),
            FileRef::new("in/ssp2_2050.zip"),
        ];
        assert_eq!(pick_scenario(&candidates, "ssp2").unwrap().token, "ssp2_2050");
        // matching is case sensitive
        assert!(pick_scenario(&candidates, "SSP2").is_none());
    }

    #[test]
    fn test_select_scenario_from_dir() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "region_ssp1_2030.zip");
        let wanted = touch(dir.path(), "region_ssp2_2050.zip");
        let picked = select_scenario(dir.path(), "ssp2").unwrap();
        assert_eq!(picked.path, wanted);
        assert_eq!(picked.token, "region_ssp2_2050");

        let err = select_scenario(dir.path(), "ssp4").unwrap_err();
        assert!(matches!(err, DataPrepError::ScenarioNotFound { .. }));
        assert!(err.to_string().contains("ssp4"));
    }
}
