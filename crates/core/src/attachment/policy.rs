//! What may be attached to a journal entry.

use serde::{Deserialize, Serialize};

use super::error::AttachmentError;

/// MIME type sent by clients that do not know better.
const GENERIC_MIME: &str = "application/octet-stream";

/// Allowed MIME types and the extensions that imply them.
const ALLOWED: &[(&str, &[&str])] = &[
    ("application/pdf", &["pdf"]),
    ("image/png", &["png"]),
    ("image/jpeg", &["jpg", "jpeg"]),
    ("image/gif", &["gif"]),
    ("image/webp", &["webp"]),
    ("application/msword", &["doc"]),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        &["docx"],
    ),
    ("application/vnd.ms-excel", &["xls"]),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        &["xlsx"],
    ),
    ("application/vnd.ms-powerpoint", &["ppt"]),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        &["pptx"],
    ),
    ("text/csv", &["csv"]),
    ("text/plain", &["txt"]),
    ("application/vnd.ms-outlook", &["msg"]),
    ("message/rfc822", &["eml"]),
];

/// Size and type limits for attachments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentPolicy {
    /// Maximum file size in bytes.
    pub max_file_size: u64,
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self {
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl AttachmentPolicy {
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Policy with a custom size limit.
    #[must_use]
    pub fn with_max_file_size(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Check if a MIME type is allowed.
    #[must_use]
    pub fn is_mime_type_allowed(mime_type: &str) -> bool {
        let mime = essence(mime_type);
        ALLOWED.iter().any(|(allowed, _)| *allowed == mime)
    }

    /// MIME type implied by a filename's extension.
    #[must_use]
    pub fn mime_for_filename(filename: &str) -> Option<&'static str> {
        let (_, ext) = filename.rsplit_once('.')?;
        let ext = ext.to_ascii_lowercase();
        ALLOWED
            .iter()
            .find(|(_, exts)| exts.contains(&ext.as_str()))
            .map(|(mime, _)| *mime)
    }

    /// Validates an upload and returns the MIME type to record.
    ///
    /// A missing or generic declared type falls back to the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is empty, too large, or of a type
    /// outside the allow-list.
    pub fn check(
        &self,
        declared: Option<&str>,
        filename: &str,
        size: u64,
    ) -> Result<String, AttachmentError> {
        if size == 0 {
            return Err(AttachmentError::EmptyFile);
        }
        if size > self.max_file_size {
            return Err(AttachmentError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        let declared = declared.map(essence).filter(|m| !m.is_empty() && *m != GENERIC_MIME);
        let mime = match declared {
            Some(mime) => mime,
            None => Self::mime_for_filename(filename)
                .map(ToString::to_string)
                .ok_or_else(|| AttachmentError::InvalidMimeType(filename.to_string()))?,
        };
        if !Self::is_mime_type_allowed(&mime) {
            return Err(AttachmentError::InvalidMimeType(mime));
        }
        Ok(mime)
    }
}

/// Lowercased type without parameters (`text/plain; charset=utf-8` → `text/plain`).
fn essence(mime: &str) -> String {
    mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("application/pdf"), "invoice.pdf", "application/pdf")]
    #[case(Some("Text/Plain; charset=utf-8"), "notes.txt", "text/plain")]
    #[case(Some("application/octet-stream"), "mail.msg", "application/vnd.ms-outlook")]
    #[case(Some("application/octet-stream"), "mail.EML", "message/rfc822")]
    #[case(None, "photo.JPG", "image/jpeg")]
    #[case(Some(""), "deck.pptx", "application/vnd.openxmlformats-officedocument.presentationml.presentation")]
    fn test_accepted_types(#[case] declared: Option<&str>, #[case] filename: &str, #[case] expected: &str) {
        let policy = AttachmentPolicy::default();
        assert_eq!(policy.check(declared, filename, 10).unwrap(), expected);
    }

    #[rstest]
    #[case(Some("application/x-msdownload"), "setup.exe")]
    #[case(Some("text/html"), "page.html")]
    #[case(Some("application/octet-stream"), "archive.zip")]
    #[case(None, "README")]
    fn test_rejected_types(#[case] declared: Option<&str>, #[case] filename: &str) {
        let err = AttachmentPolicy::default().check(declared, filename, 10).unwrap_err();
        assert!(matches!(err, AttachmentError::InvalidMimeType(_)));
    }

    #[test]
    fn test_size_limits() {
        let policy = AttachmentPolicy::default();
        assert!(policy.check(Some("application/pdf"), "a.pdf", 10 * 1024 * 1024).is_ok());
        assert!(matches!(
            policy.check(Some("application/pdf"), "a.pdf", 10 * 1024 * 1024 + 1),
            Err(AttachmentError::FileTooLarge { .. })
        ));
        assert!(matches!(
            policy.check(Some("application/pdf"), "a.pdf", 0),
            Err(AttachmentError::EmptyFile)
        ));
    }

    proptest! {
        #[test]
        fn prop_file_size_validation(
            max_size in 1024u64..10_000_000,
            file_size in 1u64..20_000_000,
        ) {
            let policy = AttachmentPolicy::with_max_file_size(max_size);
            let result = policy.check(Some("application/pdf"), "a.pdf", file_size);
            if file_size <= max_size {
                prop_assert!(result.is_ok());
            } else {
                let is_too_large = matches!(result, Err(AttachmentError::FileTooLarge { .. }));
                prop_assert!(is_too_large);
            }
        }

        #[test]
        fn prop_accepted_type_is_allowed(mime_type in "[a-z]+/[a-z0-9.-]+") {
            let result = AttachmentPolicy::default().check(Some(&mime_type), "x.bin", 1);
            prop_assert_eq!(result.is_ok(), AttachmentPolicy::is_mime_type_allowed(&mime_type));
        }
    }
}
