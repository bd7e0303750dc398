use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Where a pack lives. `http(s)://` locations are fetched, `file://` URLs
/// and anything that is not a URL are read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackLocation {
    Remote(Url),
    File(PathBuf),
}

impl PackLocation {
    #[must_use]
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Remote(url),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map_or_else(|()| Self::File(PathBuf::from(location)), Self::File),
            _ => Self::File(PathBuf::from(location)),
        }
    }

    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Display for PackLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_urls_are_remote() {
        let loc = PackLocation::parse("https://example.test/data/edisonrulings.json");
        assert!(loc.is_remote());
        assert!(PackLocation::parse("http://127.0.0.1:8080/pack.json").is_remote());
    }

    #[test]
    fn plain_paths_are_files() {
        assert_eq!(
            PackLocation::parse("data/edisonrulings.json"),
            PackLocation::File(PathBuf::from("data/edisonrulings.json"))
        );
        assert_eq!(
            PackLocation::parse("/srv/packs/pack.json"),
            PackLocation::File(PathBuf::from("/srv/packs/pack.json"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn file_urls_are_files() {
        assert_eq!(
            PackLocation::parse("file:///srv/packs/pack.json"),
            PackLocation::File(PathBuf::from("/srv/packs/pack.json"))
        );
    }

    #[test]
    fn other_schemes_fall_back_to_paths() {
        assert!(!PackLocation::parse("ftp://example.test/pack.json").is_remote());
    }
}
