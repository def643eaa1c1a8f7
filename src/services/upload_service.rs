use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs;
use uuid::Uuid;

use crate::error::{field_error, Error, Result};

const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

pub struct StoredFile {
    pub data: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

/// Resume storage on the local filesystem under a single directory.
#[derive(Clone, Debug)]
pub struct UploadService {
    root: PathBuf,
    max_bytes: usize,
}

impl UploadService {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    /// Checks size, extension and magic bytes, then writes the file under a
    /// generated name. Returns that name.
    pub async fn save_resume(&self, filename: &str, data: &Bytes) -> Result<String> {
        if data.is_empty() {
            return Err(field_error("resume", "empty", "Resume file is empty"));
        }
        if data.len() > self.max_bytes {
            return Err(field_error(
                "resume",
                "too_large",
                format!("Resume must not exceed {} bytes", self.max_bytes),
            ));
        }

        let ext = extension_of(filename).unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(field_error(
                "resume",
                "unsupported_type",
                "Resume must be a PDF, DOC or DOCX file",
            ));
        }
        if !has_expected_signature(&ext, data) {
            return Err(field_error(
                "resume",
                "invalid_content",
                format!("File content does not look like a .{} document", ext),
            ));
        }

        fs::create_dir_all(&self.root).await?;
        let stored = format!("{}.{}", Uuid::new_v4(), ext);
        fs::write(self.root.join(&stored), data).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to write resume file");
            Error::Internal(format!("Failed to save file: {}", e))
        })?;

        tracing::debug!(file = %stored, bytes = data.len(), "Stored resume");
        Ok(stored)
    }

    pub async fn read(&self, stored: &str) -> Result<StoredFile> {
        let path = self.resolve(stored)?;
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound("Resume file not found".to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let content_type = match extension_of(stored).as_deref() {
            Some("pdf") => "application/pdf",
            Some("doc") => "application/msword",
            Some("docx") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            _ => "application/octet-stream",
        };
        Ok(StoredFile {
            data,
            content_type,
            file_name: stored.to_string(),
        })
    }

    pub async fn discard(&self, stored: &str) {
        let Ok(path) = self.resolve(stored) else {
            return;
        };
        if let Err(e) = fs::remove_file(&path).await {
            tracing::warn!(error = %e, file = %stored, "Could not remove orphaned resume");
        }
    }

    fn resolve(&self, stored: &str) -> Result<PathBuf> {
        let name = Path::new(stored)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| *n == stored)
            .ok_or_else(|| Error::NotFound("Resume file not found".to_string()))?;
        Ok(self.root.join(name))
    }
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn has_expected_signature(ext: &str, data: &[u8]) -> bool {
    match ext {
        "pdf" => data.starts_with(b"%PDF"),
        // OLE compound document
        "doc" => data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0]),
        // zip container
        "docx" => data.starts_with(b"PK\x03\x04"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> (UploadService, PathBuf) {
        let dir = std::env::temp_dir().join(format!("resume-test-{}", Uuid::new_v4()));
        (UploadService::new(&dir, 64), dir)
    }

    #[tokio::test]
    async fn stores_and_reads_back_pdf() {
        let (svc, dir) = service();
        let stored = svc
            .save_resume("CV.PDF", &Bytes::from_static(b"%PDF-1.4 test"))
            .await
            .unwrap();
        assert!(stored.ends_with(".pdf"));

        let file = svc.read(&stored).await.unwrap();
        assert_eq!(file.content_type, "application/pdf");
        assert_eq!(file.data, b"%PDF-1.4 test");
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn rejects_oversized_and_foreign_files() {
        let (svc, _dir) = service();
        let big = Bytes::from(vec![b'%'; 65]);
        assert!(matches!(
            svc.save_resume("cv.pdf", &big).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            svc.save_resume("cv.exe", &Bytes::from_static(b"MZ")).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            svc.save_resume("cv.pdf", &Bytes::from_static(b"not a pdf")).await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn traversal_names_are_not_found() {
        let (svc, _dir) = service();
        assert!(matches!(
            svc.read("../etc/passwd").await,
            Err(Error::NotFound(_))
        ));
    }
}
