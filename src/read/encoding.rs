// src/read/encoding.rs
use anyhow::{Context, Result};
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::{fs, path::Path};
use tracing::debug;

/// Best-effort guess of a file's text encoding from its full byte content.
///
/// A byte-order mark wins outright; otherwise the bytes are fed through a
/// statistical detector. Ambiguous input may be guessed wrong.
pub fn detect_encoding<P: AsRef<Path>>(path: P) -> Result<&'static Encoding> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(detect_encoding_bytes(&bytes))
}

pub fn detect_encoding_bytes(bytes: &[u8]) -> &'static Encoding {
    if let Some((enc, _)) = Encoding::for_bom(bytes) {
        debug!(encoding = enc.name(), "byte-order mark found");
        return enc;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn utf8_text_detects_as_utf8() {
        let enc = detect_encoding_bytes("Name,City\nJosé,São Paulo\n".as_bytes());
        assert_eq!(enc, encoding_rs::UTF_8);
    }

    #[test]
    fn latin1_bytes_are_not_taken_for_utf8() {
        // ISO-8859-1 bytes for umlauts and accents
        let bytes: &[u8] = b"Name,City,State\n\
            M\xfcller,K\xf6ln,Nordrhein-Westfalen\n\
            Schr\xf6der,M\xfcnchen,Bayern\n\
            Jos\xe9 Garc\xeda,Z\xfcrich,Z\xfcrich\n\
            Fran\xe7ois,Besan\xe7on,Franche-Comt\xe9\n";
        let enc = detect_encoding_bytes(bytes);
        assert_ne!(enc, encoding_rs::UTF_8);
        let (text, _, had_errors) = enc.decode(bytes);
        assert!(!had_errors);
        assert!(text.contains("Müller"));
        assert!(text.contains("Köln"));
    }

    #[test]
    fn bom_wins() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"a,b\n1,2\n");
        assert_eq!(detect_encoding_bytes(&bytes), encoding_rs::UTF_8);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(detect_encoding("/definitely/not/here.csv").is_err());
    }

    #[test]
    fn ascii_file_decodes_unchanged() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"Key,Name\n1,Anne\n")?;
        let enc = detect_encoding(tmp.path())?;
        let (text, _, had_errors) = enc.decode(b"Key,Name\n1,Anne\n");
        assert!(!had_errors);
        assert_eq!(text, "Key,Name\n1,Anne\n");
        Ok(())
    }
}
