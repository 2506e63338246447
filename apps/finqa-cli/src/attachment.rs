//! Loading attachments from disk

use std::fs;
use std::path::Path;

use anyhow::Context;
use finqa_core::validation::PDF_MIME_TYPE;
use finqa_core::FileAttachment;

/// MIME type from the file extension, as a browser file picker reports it
pub fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => PDF_MIME_TYPE,
        Some("htm") | Some("html") => "text/html",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

pub fn load(path: &Path) -> anyhow::Result<FileAttachment> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(FileAttachment::new(name, mime_type_for(path), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(mime_type_for(Path::new("a/B.PDF")), PDF_MIME_TYPE);
        assert_eq!(mime_type_for(Path::new("filing.htm")), "text/html");
        assert_eq!(mime_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_load_reads_bytes_and_name() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4\n%%EOF").unwrap();

        let attachment = load(file.path()).unwrap();
        assert_eq!(attachment.mime_type, PDF_MIME_TYPE);
        assert_eq!(attachment.size(), 14);
        assert!(attachment.name.ends_with(".pdf"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load(Path::new("/nonexistent/report.pdf")).unwrap_err();
        assert!(err.to_string().contains("report.pdf"));
    }
}
