use bytes::Bytes;
use tracing::error;

use super::repository::{AssetId, SubmissionStore};
use crate::cms::CmsError;

pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

const DOC_MIME: &str = "application/msword";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Resume file received with a job application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResumeRejection {
    #[error("resume file is required")]
    Missing,
    #[error("resume must be a PDF, DOC or DOCX file")]
    UnsupportedType,
    #[error("resume must not exceed 5 MB")]
    TooLarge { size: usize },
}

/// Wraps any asset-store failure; the cause is logged, not exposed.
#[derive(Debug, thiserror::Error)]
#[error("failed to upload resume")]
pub struct UploadFailed {
    #[source]
    source: CmsError,
}

impl UploadFailed {
    pub fn cause(&self) -> &CmsError {
        &self.source
    }
}

impl ResumeUpload {
    fn extension(&self) -> Option<String> {
        let (_, extension) = self.file_name.rsplit_once('.')?;
        Some(extension.to_ascii_lowercase())
    }

    fn declared_essence(&self) -> Option<String> {
        let declared = self.content_type.as_deref()?;
        let mime: mime::Mime = declared.trim().parse().ok()?;
        Some(mime.essence_str().to_ascii_lowercase())
    }

    fn has_allowed_type(&self) -> bool {
        let by_mime = self.declared_essence().is_some_and(|essence| {
            essence == mime::APPLICATION_PDF.essence_str()
                || essence == DOC_MIME
                || essence == DOCX_MIME
        });
        let by_extension = self
            .extension()
            .is_some_and(|extension| ALLOWED_EXTENSIONS.contains(&extension.as_str()));
        by_mime || by_extension
    }

    /// Declared type, or one guessed from the file name when none was sent.
    pub fn upload_content_type(&self) -> String {
        self.declared_essence().unwrap_or_else(|| {
            mime_guess::from_path(&self.file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        })
    }
}

/// Presence, type and size checks applied before any bytes leave the service.
pub fn check_resume(upload: Option<&ResumeUpload>) -> Result<&ResumeUpload, ResumeRejection> {
    let upload = upload
        .filter(|upload| !upload.bytes.is_empty())
        .ok_or(ResumeRejection::Missing)?;

    if !upload.has_allowed_type() {
        return Err(ResumeRejection::UnsupportedType);
    }

    if upload.bytes.len() > MAX_RESUME_BYTES {
        return Err(ResumeRejection::TooLarge {
            size: upload.bytes.len(),
        });
    }

    Ok(upload)
}

/// Send a checked resume to the asset store and return the created asset id.
pub async fn store_resume<S>(store: &S, upload: &ResumeUpload) -> Result<AssetId, UploadFailed>
where
    S: SubmissionStore + ?Sized,
{
    let content_type = upload.upload_content_type();
    store
        .upload_file(&upload.file_name, &content_type, upload.bytes.clone())
        .await
        .map_err(|source| {
            error!(error = %source, file_name = %upload.file_name, "resume upload failed");
            UploadFailed { source }
        })
}
