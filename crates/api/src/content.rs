//! Content decoding for Drive files.
//!
//! Native Google documents have no byte representation and are exported
//! to a fixed target format per subtype. Everything else is downloaded
//! raw and returned either as UTF-8 text or as a base64 envelope,
//! keeping binary payloads intact inside a text-oriented transport.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::client::DriveClient;
use crate::error::Error;
use crate::types::{FileContent, NATIVE_DOC_PREFIX};

/// Export target for a native document subtype.
pub fn export_mime_for(mime_type: &str) -> &'static str {
    match mime_type {
        "application/vnd.google-apps.document" => "text/markdown",
        "application/vnd.google-apps.spreadsheet" => "text/csv",
        "application/vnd.google-apps.presentation" => "text/plain",
        "application/vnd.google-apps.drawing" => "image/png",
        _ => "text/plain",
    }
}

/// Decode a raw payload: UTF-8 text for text-family and JSON mime types,
/// base64 otherwise.
pub fn decode_blob(mime_type: &str, bytes: Vec<u8>) -> FileContent {
    let content = if mime_type.starts_with("text/") || mime_type == "application/json" {
        String::from_utf8_lossy(&bytes).into_owned()
    } else {
        BASE64.encode(&bytes)
    };
    FileContent {
        mime_type: mime_type.to_string(),
        content,
    }
}

/// Read a file's content, deciding between export and raw download from
/// a metadata precondition fetch.
///
/// Fails with the provider's error if `file_id` does not resolve. Binary
/// export targets (drawing → PNG) are still fetched in text mode; this
/// is a known limitation.
pub async fn read_content(client: &DriveClient, file_id: &str) -> Result<FileContent, Error> {
    let meta = client.get_metadata(file_id).await?;

    if meta.mime_type.starts_with(NATIVE_DOC_PREFIX) {
        let target = export_mime_for(&meta.mime_type);
        let content = client.export(file_id, target).await?;
        return Ok(FileContent {
            mime_type: target.to_string(),
            content,
        });
    }

    let mime_type = if meta.mime_type.is_empty() {
        "application/octet-stream".to_string()
    } else {
        meta.mime_type
    };
    let bytes = client.download(file_id).await?;
    Ok(decode_blob(&mime_type, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spreadsheet_exports_as_csv() {
        assert_eq!(
            export_mime_for("application/vnd.google-apps.spreadsheet"),
            "text/csv"
        );
    }

    #[test]
    fn document_exports_as_markdown() {
        assert_eq!(
            export_mime_for("application/vnd.google-apps.document"),
            "text/markdown"
        );
    }

    #[test]
    fn drawing_exports_as_png() {
        assert_eq!(
            export_mime_for("application/vnd.google-apps.drawing"),
            "image/png"
        );
    }

    #[test]
    fn unknown_native_subtype_exports_as_plain_text() {
        assert_eq!(
            export_mime_for("application/vnd.google-apps.jam"),
            "text/plain"
        );
    }

    #[test]
    fn json_decodes_as_text() {
        let result = decode_blob("application/json", br#"{"k": 1}"#.to_vec());
        assert_eq!(result.mime_type, "application/json");
        assert_eq!(result.content, r#"{"k": 1}"#);
    }

    #[test]
    fn text_family_decodes_as_text() {
        let result = decode_blob("text/csv", b"a,b\n1,2\n".to_vec());
        assert_eq!(result.content, "a,b\n1,2\n");
    }

    #[test]
    fn binary_encodes_as_base64() {
        let bytes = vec![0x89, 0x50, 0x4e, 0x47];
        let result = decode_blob("image/png", bytes.clone());
        assert_eq!(result.mime_type, "image/png");
        assert_eq!(result.content, BASE64.encode(&bytes));
    }

    #[test]
    fn invalid_utf8_text_is_replaced_not_dropped() {
        let result = decode_blob("text/plain", vec![b'h', b'i', 0xff]);
        assert_eq!(result.content, "hi\u{fffd}");
    }
}
