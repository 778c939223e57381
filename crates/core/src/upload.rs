//! Upload file-type checks and stored-file naming.

use rand::Rng;

use crate::error::CoreError;

/// The only accepted upload content type.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// The only accepted upload extension (compared case-insensitively).
pub const PDF_EXTENSION: &str = "pdf";

/// Default upload ceiling in bytes (50 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Return the lower-cased extension of `filename`, if it has one.
pub fn file_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() || ext.contains(['/', '\\']) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Both the extension AND the declared content type must indicate a PDF.
pub fn is_pdf_upload(filename: &str, content_type: Option<&str>) -> bool {
    let extension_ok = file_extension(filename).as_deref() == Some(PDF_EXTENSION);
    let content_type_ok = content_type
        .map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .eq_ignore_ascii_case(PDF_CONTENT_TYPE)
        })
        .unwrap_or(false);
    extension_ok && content_type_ok
}

/// Validate an upload's file type, returning the message shown to clients.
pub fn validate_pdf_upload(filename: &str, content_type: Option<&str>) -> Result<(), CoreError> {
    if is_pdf_upload(filename, content_type) {
        Ok(())
    } else {
        Err(CoreError::Validation("Only PDF files are allowed".into()))
    }
}

/// Name under which an upload is stored: `project-<millis>-<random>.pdf`.
///
/// The client-supplied filename is never used on disk.
pub fn stored_file_name() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("project-{millis}-{suffix}.{PDF_EXTENSION}")
}

/// Reduce a client-supplied filename to something safe for storage in the
/// row and for a `Content-Disposition` header: path components, quotes,
/// backslashes and control characters are removed.
pub fn display_file_name(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        format!("project.{PDF_EXTENSION}")
    } else {
        cleaned.to_string()
    }
}
