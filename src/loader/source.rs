//! Where model bytes come from: a bundled file or a remote URL.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch \"{url}\": {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A model source descriptor. The distinction between local and remote is
/// opaque to the rest of the viewer: both resolve to raw OBJ text.
#[derive(Debug, Clone)]
pub enum ModelSource {
    /// A file on disk.
    Asset(PathBuf),
    /// An HTTP(S) URL, fetched with a plain GET. No auth, no retries.
    Remote(String),
}

impl ModelSource {
    /// Classifies a user-supplied descriptor: anything with an http(s)
    /// scheme is remote, everything else is a path.
    pub fn parse(descriptor: &str) -> Self {
        if descriptor.starts_with("http://") || descriptor.starts_with("https://") {
            Self::Remote(descriptor.to_string())
        } else {
            Self::Asset(PathBuf::from(descriptor))
        }
    }

    /// Resolves the source to raw model text.
    ///
    /// Remote fetches block; callers that must stay responsive run this on
    /// a worker thread (see the app's load pipeline).
    pub fn fetch(&self) -> Result<String, SourceError> {
        match self {
            Self::Asset(path) => fs::read_to_string(path).map_err(|source| SourceError::Io {
                path: path.clone(),
                source,
            }),
            Self::Remote(url) => {
                let map_err = |source| SourceError::Http {
                    url: url.clone(),
                    source,
                };
                let response = reqwest::blocking::get(url).map_err(map_err)?;
                let response = response.error_for_status().map_err(map_err)?;
                response.text().map_err(map_err)
            }
        }
    }

    /// Human-readable description for logs and the UI status line.
    pub fn describe(&self) -> String {
        match self {
            Self::Asset(path) => path.display().to_string(),
            Self::Remote(url) => url.clone(),
        }
    }
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_classifies_urls_and_paths() {
        assert!(matches!(
            ModelSource::parse("http://localhost:8080/example.obj"),
            ModelSource::Remote(_)
        ));
        assert!(matches!(
            ModelSource::parse("https://models.example.com/a.obj"),
            ModelSource::Remote(_)
        ));
        assert!(matches!(
            ModelSource::parse("assets/example.obj"),
            ModelSource::Asset(_)
        ));
        assert!(matches!(
            ModelSource::parse("/tmp/example.obj"),
            ModelSource::Asset(_)
        ));
    }

    #[test]
    fn missing_file_reports_io_error_with_path() {
        let source = ModelSource::Asset("/no/such/file.obj".into());
        let err = source.fetch().unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("/no/such/file.obj"));
    }

    #[test]
    fn asset_roundtrip_reads_file_contents() {
        let path = std::env::temp_dir().join("meshview_source_test.obj");
        std::fs::write(&path, "v 0 0 0\n").unwrap();

        let source = ModelSource::Asset(path.clone());
        let text = source.fetch().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(text, "v 0 0 0\n");
    }
}
