//! MIME type detection for `--mime`.
//!
//! Regular files are sniffed by their magic bytes with [infer]. When the header is not
//! recognized the extension table decides, then a short UTF-8 check picks `text/plain`.

use crate::core::entry::EntryKind;

use phf::phf_map;

use std::fs::File;
use std::io::Read;
use std::path::Path;

// Bytes read for the text heuristic
const TEXT_PEEK_BYTES: usize = 1024;

const FALLBACK: &str = "application/octet-stream";

/// Types infer has no magic for, mostly text formats.
static EXT_MIME_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "txt" => "text/plain",
    "md" => "text/markdown",
    "rs" => "text/x-rust",
    "go" => "text/x-go",
    "py" => "text/x-python",
    "js" => "text/javascript",
    "ts" => "text/typescript",
    "html" => "text/html",
    "htm" => "text/html",
    "css" => "text/css",
    "csv" => "text/csv",
    "json" => "application/json",
    "toml" => "application/toml",
    "yaml" => "application/yaml",
    "yml" => "application/yaml",
    "xml" => "application/xml",
    "sh" => "application/x-sh",
    "c" => "text/x-c",
    "h" => "text/x-c",
    "cpp" => "text/x-c++",
    "java" => "text/x-java",
    "svg" => "image/svg+xml",
    "lock" => "text/plain",
};

/// Detects the MIME type of `path` given its (already resolved) kind.
pub fn detect(path: &Path, kind: EntryKind) -> String {
    match kind {
        EntryKind::Directory => "inode/directory".to_string(),
        EntryKind::Symlink => "inode/symlink".to_string(),
        EntryKind::Other => "inode/x-special".to_string(),
        EntryKind::File => detect_file(path),
    }
}

fn detect_file(path: &Path) -> String {
    if let Ok(Some(kind)) = infer::get_from_path(path) {
        return kind.mime_type().to_string();
    }

    if let Some(mime) = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(|ext| EXT_MIME_MAP.get(ext.to_ascii_lowercase().as_str()))
    {
        return (*mime).to_string();
    }

    if looks_like_text(path) {
        "text/plain".to_string()
    } else {
        FALLBACK.to_string()
    }
}

fn looks_like_text(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut buf = [0u8; TEXT_PEEK_BYTES];
    let n = file.read(&mut buf).unwrap_or(0);
    if n == 0 {
        return true;
    }
    if buf[..n].contains(&0) {
        return false;
    }
    // the peek may cut a multi-byte char in half
    match std::str::from_utf8(&buf[..n]) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn detects_by_magic_extension_and_content() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;

        let png = dir.path().join("image.bin");
        fs::write(&png, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0])?;
        assert_eq!(detect(&png, EntryKind::File), "image/png");

        let rust = dir.path().join("main.rs");
        fs::write(&rust, "fn main() {}\n")?;
        assert_eq!(detect(&rust, EntryKind::File), "text/x-rust");

        let notes = dir.path().join("NOTES");
        fs::write(&notes, "plain words\n")?;
        assert_eq!(detect(&notes, EntryKind::File), "text/plain");

        let blob = dir.path().join("blob");
        fs::write(&blob, [1u8, 0, 2, 0, 3])?;
        assert_eq!(detect(&blob, EntryKind::File), FALLBACK);

        assert_eq!(detect(dir.path(), EntryKind::Directory), "inode/directory");
        Ok(())
    }
}
