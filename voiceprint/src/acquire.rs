//! Bringing reference audio onto local disk.
//!
//! Remote locators are downloaded with a blocking HTTP client under a
//! bounded timeout; local locators are used in place.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::AcquisitionError;

/// Default bound on a whole download.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolves a source locator to a readable local audio file.
pub trait AudioSource: Send + Sync {
    fn fetch(&self, locator: &str) -> Result<AcquiredAudio, AcquisitionError>;
}

/// A local audio file produced by [`AudioSource::fetch`].
///
/// Downloaded files are temporary and are deleted when this value drops.
#[derive(Debug)]
pub struct AcquiredAudio {
    file: Acquired,
}

#[derive(Debug)]
enum Acquired {
    Local(PathBuf),
    Temporary(NamedTempFile),
}

impl AcquiredAudio {
    /// Wraps an existing file that must outlive the returned value.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Acquired::Local(path.into()),
        }
    }

    /// Takes ownership of a temporary file; it is removed on drop.
    pub fn temporary(file: NamedTempFile) -> Self {
        Self {
            file: Acquired::Temporary(file),
        }
    }

    pub fn path(&self) -> &Path {
        match &self.file {
            Acquired::Local(p) => p,
            Acquired::Temporary(f) => f.path(),
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self.file, Acquired::Temporary(_))
    }
}

/// Whether a locator names a remote resource.
pub fn is_remote(locator: &str) -> bool {
    let lower = locator.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// File extension of the last path segment of a URL or path, if it looks
/// like one (1 to 5 alphanumeric characters).
pub fn locator_extension(locator: &str) -> Option<&str> {
    let path = locator.split(['?', '#']).next().unwrap_or(locator);
    let segment = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = segment.rsplit_once('.')?;
    let plausible = !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric());
    plausible.then_some(ext)
}

/// Default [`AudioSource`]: HTTP(S) download into a temporary file, or a
/// local path (optionally `file://`-prefixed) used directly.
pub struct Fetcher {
    agent: ureq::Agent,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn download(&self, url: &str) -> Result<AcquiredAudio, AcquisitionError> {
        info!(url, timeout_secs = self.timeout.as_secs(), "downloading reference audio");

        let mut response = self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::StatusCode(status) => AcquisitionError::Status {
                url: url.to_string(),
                status,
            },
            other => AcquisitionError::Transport {
                url: url.to_string(),
                message: other.to_string(),
            },
        })?;

        let suffix = locator_extension(url)
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        let mut tmp = tempfile::Builder::new()
            .prefix("qari-")
            .suffix(&suffix)
            .tempfile()?;

        let mut body = response.body_mut().as_reader();
        let bytes = io::copy(&mut body, tmp.as_file_mut()).map_err(|e| {
            AcquisitionError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            }
        })?;

        debug!(url, bytes, path = %tmp.path().display(), "download complete");
        Ok(AcquiredAudio::temporary(tmp))
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT)
    }
}

impl AudioSource for Fetcher {
    fn fetch(&self, locator: &str) -> Result<AcquiredAudio, AcquisitionError> {
        let locator = locator.trim();
        if is_remote(locator) {
            return self.download(locator);
        }

        let path = Path::new(locator.strip_prefix("file://").unwrap_or(locator));
        if !path.is_file() {
            return Err(AcquisitionError::NotFound(path.display().to_string()));
        }
        Ok(AcquiredAudio::local(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_detection() {
        assert!(is_remote("https://server.mp3quran.net/husr/001.mp3"));
        assert!(is_remote("HTTP://example.com/a.wav"));
        assert!(!is_remote("/home/user/a.mp3"));
        assert!(!is_remote("file:///tmp/a.mp3"));
    }

    #[test]
    fn extension_from_locator() {
        assert_eq!(locator_extension("https://x.net/husr/001.mp3"), Some("mp3"));
        assert_eq!(locator_extension("https://x.net/a.wav?dl=1#t=3"), Some("wav"));
        assert_eq!(locator_extension("https://x.net/stream"), None);
        assert_eq!(locator_extension("https://x.net/v1.2/stream"), None);
        assert_eq!(locator_extension("/tmp/clip.flac"), Some("flac"));
    }

    #[test]
    fn local_file_used_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        std::fs::write(&path, b"RIFF").unwrap();

        let fetcher = Fetcher::default();
        let got = fetcher.fetch(path.to_str().unwrap()).unwrap();
        assert_eq!(got.path(), path);
        assert!(!got.is_temporary());

        let via_scheme = fetcher.fetch(&format!("file://{}", path.display())).unwrap();
        assert_eq!(via_scheme.path(), path);
    }

    #[test]
    fn missing_local_file() {
        let err = Fetcher::default().fetch("/no/such/recitation.mp3").unwrap_err();
        assert!(matches!(err, AcquisitionError::NotFound(_)));
    }

    #[test]
    fn unreachable_host_is_acquisition_error() {
        // Port 9 on localhost: nothing listens, connection is refused quickly.
        let fetcher = Fetcher::new(Duration::from_secs(2));
        let err = fetcher.fetch("http://127.0.0.1:9/a.mp3").unwrap_err();
        assert!(matches!(err, AcquisitionError::Transport { .. }));
    }

    #[test]
    fn temporary_file_removed_on_drop() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_path_buf();
        let acquired = AcquiredAudio::temporary(tmp);
        assert!(acquired.is_temporary());
        assert!(path.exists());
        drop(acquired);
        assert!(!path.exists());
    }
}
