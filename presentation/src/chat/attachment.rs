//! Design files attached from disk

use arkcutt_domain::Attachment;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::io;
use std::path::Path;

/// Read a file and encode it as a base64 attachment.
pub fn load_attachment(path: &Path) -> io::Result<Attachment> {
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            )
        })?;
    Ok(Attachment::new(filename, STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("box.dxf");
        std::fs::write(&path, "0\nSECTION\n").unwrap();

        let attachment = load_attachment(&path).unwrap();
        assert_eq!(attachment.filename, "box.dxf");
        assert_eq!(
            STANDARD.decode(&attachment.content_base64).unwrap(),
            b"0\nSECTION\n"
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_attachment(&dir.path().join("nope.dxf")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
