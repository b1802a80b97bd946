//! Upload validation: pure checks run before any backend call.
//!
//! Two MIME checks run per upload. The declared content type, when the
//! client sends one, must be in the allowed set. Independently, the
//! effective type — declared, else inferred from the filename extension —
//! must also be in the set; this second check covers uploads that declare
//! no content type at all.

use crate::error::GenerateError;

/// Reject a declared content type outside the allowed set.
///
/// A missing declaration passes here; [`resolve_media_type`] catches it.
pub fn check_declared_media_type(
    declared: Option<&str>,
    allowed: &[String],
) -> Result<(), GenerateError> {
    match declared {
        Some(mime) if !allowed.iter().any(|a| a == mime) => {
            Err(GenerateError::UnsupportedMediaType)
        }
        _ => Ok(()),
    }
}

/// Reject an empty payload.
pub fn check_payload(payload: &[u8]) -> Result<(), GenerateError> {
    if payload.is_empty() {
        return Err(GenerateError::EmptyPayload);
    }
    Ok(())
}

/// Infer a MIME type from a filename extension.
pub fn mime_from_filename(filename: &str) -> Option<&'static str> {
    let extension = filename.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "svg" => Some("image/svg+xml"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Resolve the effective MIME type and re-validate it against the
/// allowed set: declared type first, filename inference as fallback.
pub fn resolve_media_type(
    declared: Option<&str>,
    filename: Option<&str>,
    allowed: &[String],
) -> Result<String, GenerateError> {
    let resolved = declared.or_else(|| filename.and_then(mime_from_filename));
    match resolved {
        Some(mime) if allowed.iter().any(|a| a == mime) => Ok(mime.to_string()),
        _ => Err(GenerateError::UnrecognizedMediaType),
    }
}
