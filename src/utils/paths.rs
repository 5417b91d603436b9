use std::path::{Path, PathBuf};

/// Returns true if the path's extension matches any of the given extensions (case-insensitive)
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Returns the path with an empty string mapped to `None`
///
/// Library documents written by older versions store a missing cover as `""`.
pub fn none_if_empty(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
pub mod test {
    use test_case::test_case;

    use super::*;

    #[test_case("games/Celeste.exe", true)]
    #[test_case("games/Celeste.EXE", true)]
    #[test_case("games/shortcut.lnk", true)]
    #[test_case("games/readme.txt", false)]
    #[test_case("games/noextension", false)]
    fn test_has_extension(path: &str, expected: bool) {
        assert_eq!(has_extension(Path::new(path), &["exe", "lnk"]), expected);
    }

    #[test_case(None, None)]
    #[test_case(Some(""), None)]
    #[test_case(Some("covers/a.png"), Some("covers/a.png"))]
    fn test_none_if_empty(input: Option<&str>, expected: Option<&str>) {
        assert_eq!(
            none_if_empty(input.map(PathBuf::from)),
            expected.map(PathBuf::from)
        );
    }
}
