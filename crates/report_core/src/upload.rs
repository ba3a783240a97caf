//! Checks applied to a pitch deck before it is sent for scoring.

use std::path::Path;

use thiserror::Error;

pub const PDF_MIME: &str = "application/pdf";
pub const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Largest deck the scoring API accepts.
pub const MAX_DECK_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("Please enter a User ID")]
    MissingUserId,
    #[error("Please enter a Title")]
    MissingTitle,
    #[error("Please select a file")]
    MissingFile,
    #[error("Please upload a PDF or PPTX file")]
    UnsupportedType,
    #[error("File size must be less than 50MB")]
    TooLarge { size: u64 },
}

/// A deck that passed validation, ready for the multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckUpload {
    pub user_id: String,
    pub title: String,
    pub file_name: String,
    pub mime: &'static str,
    pub size: u64,
}

pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some(PDF_MIME),
        "pptx" => Some(PPTX_MIME),
        _ => None,
    }
}

/// Validates the form fields in the order the upload form reports them.
pub fn validate_deck(
    user_id: &str,
    title: &str,
    file: Option<(&Path, u64)>,
) -> Result<DeckUpload, UploadRejection> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(UploadRejection::MissingUserId);
    }
    let title = title.trim();
    if title.is_empty() {
        return Err(UploadRejection::MissingTitle);
    }
    let (path, size) = file.ok_or(UploadRejection::MissingFile)?;
    let mime = mime_for_path(path).ok_or(UploadRejection::UnsupportedType)?;
    if size > MAX_DECK_BYTES {
        return Err(UploadRejection::TooLarge { size });
    }

    Ok(DeckUpload {
        user_id: user_id.to_string(),
        title: title.to_string(),
        file_name: path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("pitch_deck")
            .to_string(),
        mime,
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(name: &str, size: u64) -> Option<(&Path, u64)> {
        Some((Path::new(name), size))
    }

    #[test]
    fn accepts_pdf_and_pptx() {
        let upload = validate_deck(" founder_01 ", "Solar", deck("decks/pitch.PDF", 1024)).unwrap();
        assert_eq!(upload.user_id, "founder_01");
        assert_eq!(upload.mime, PDF_MIME);
        assert_eq!(upload.file_name, "pitch.PDF");
        assert_eq!(
            validate_deck("u", "t", deck("pitch.pptx", 10)).unwrap().mime,
            PPTX_MIME
        );
    }

    #[test]
    fn fields_are_checked_before_the_file() {
        assert_eq!(
            validate_deck(" ", "", deck("a.txt", 1)),
            Err(UploadRejection::MissingUserId)
        );
        assert_eq!(
            validate_deck("u", "  ", None),
            Err(UploadRejection::MissingTitle)
        );
        assert_eq!(validate_deck("u", "t", None), Err(UploadRejection::MissingFile));
    }

    #[test]
    fn rejects_other_types_and_oversized_decks() {
        assert_eq!(
            validate_deck("u", "t", deck("pitch.key", 1)),
            Err(UploadRejection::UnsupportedType)
        );
        assert!(validate_deck("u", "t", deck("pitch.pdf", MAX_DECK_BYTES)).is_ok());
        let rejection = validate_deck("u", "t", deck("pitch.pdf", MAX_DECK_BYTES + 1)).unwrap_err();
        assert_eq!(rejection.to_string(), "File size must be less than 50MB");
    }
}
