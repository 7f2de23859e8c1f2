//! File selection: load a user-chosen document into a [`SelectedFile`].
//!
//! No validation of type or size happens here. Whatever the user picks is
//! forwarded to the backend, which is the only party that knows which formats
//! it can extract text from; its rejection surfaces as an upload error.

use crate::error::DocAnalyzerError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// MIME type used when the extension is unknown.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// A file chosen for upload: its bytes plus the name and MIME type sent in
/// the multipart part.
///
/// Cloning is cheap; the bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    file_name: String,
    mime: String,
    bytes: Arc<[u8]>,
}

impl SelectedFile {
    /// Wrap in-memory bytes. The MIME type is guessed from `file_name`.
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let mime = guess_mime(&file_name);
        Self {
            file_name,
            mime,
            bytes: Arc::from(bytes.into()),
        }
    }

    /// Override the guessed MIME type.
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = mime.into();
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Read a local file into a [`SelectedFile`].
pub async fn load_path(path: impl AsRef<Path>) -> Result<SelectedFile, DocAnalyzerError> {
    let path = path.as_ref();

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DocAnalyzerError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(DocAnalyzerError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(DocAnalyzerError::FileReadFailed {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    debug!("Loaded {} ({} bytes)", path.display(), bytes.len());
    Ok(SelectedFile::from_bytes(file_name, bytes))
}

/// Guess a MIME type from a file name's extension.
pub fn guess_mime(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| FALLBACK_MIME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime("report.pdf"), "application/pdf");
        assert_eq!(guess_mime("REPORT.PDF"), "application/pdf");
        assert_eq!(guess_mime("notes.txt"), "text/plain");
        assert_eq!(guess_mime("no_extension"), FALLBACK_MIME);
        assert_eq!(guess_mime("data.zzqx"), FALLBACK_MIME);
    }

    #[test]
    fn test_guess_mime_office_and_ebook_formats() {
        assert_eq!(
            guess_mime("contract.docx"),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(
            guess_mime("sheet.xlsx"),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(
            guess_mime("slides.pptx"),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        );
        assert_eq!(guess_mime("book.epub"), "application/epub+zip");
        assert_eq!(guess_mime("scan.webp"), "image/webp");
        for name in ["page.xml", "notes.odp"] {
            assert_ne!(guess_mime(name), FALLBACK_MIME, "{name}");
        }
    }

    #[test]
    fn test_from_bytes_and_override() {
        let f = SelectedFile::from_bytes("scan.bin", b"abc".to_vec());
        assert_eq!(f.mime(), FALLBACK_MIME);
        assert_eq!(f.len(), 3);
        let f = f.with_mime("image/webp");
        assert_eq!(f.mime(), "image/webp");
        assert_eq!(f.bytes(), b"abc");
    }

    #[test]
    fn test_debug_omits_bytes() {
        let f = SelectedFile::from_bytes("a.txt", vec![0u8; 4096]);
        let dbg = format!("{f:?}");
        assert!(dbg.contains("len: 4096"), "got: {dbg}");
        assert!(dbg.len() < 200);
    }

    #[test]
    fn test_load_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"%PDF-1.7 fake").unwrap();

        let selected = tokio_test::block_on(load_path(&path)).unwrap();
        assert_eq!(selected.file_name(), "report.pdf");
        assert_eq!(selected.mime(), "application/pdf");
        assert_eq!(selected.bytes(), b"%PDF-1.7 fake");
    }

    #[test]
    fn test_load_path_missing() {
        let err = tokio_test::block_on(load_path("/definitely/not/here.pdf")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(matches!(err, DocAnalyzerError::FileNotFound { .. }));
    }
}
