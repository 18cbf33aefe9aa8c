use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::errors::Result;

const CHUNK_SIZE: usize = 64 * 1024;

/// 流式计算文件的 SHA-256（小写十六进制）
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn sha256_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            sha256_bytes(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_file_digest_matches_bytes_and_detects_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recibo-1.pdf");
        std::fs::write(&path, b"%PDF-1.3 recibo").unwrap();

        let original = sha256_file(&path).unwrap();
        assert_eq!(original, sha256_bytes(b"%PDF-1.3 recibo"));

        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b" alterado").unwrap();
        assert_ne!(sha256_file(&path).unwrap(), original);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(sha256_file(&dir.path().join("nada.pdf")).is_err());
    }
}
