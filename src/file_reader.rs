//! Address list input with automatic gzip decompression
//!
//! Batch lookups read one address per line from a file, a gzip-compressed
//! file, or stdin.
//!
//! # Example
//!
//! ```rust,no_run
//! use qqwry::file_reader;
//!
//! // Automatically detects .gz and decompresses
//! let reader = file_reader::open("addresses.txt.gz")?;
//! let addresses = file_reader::read_addresses(reader)?;
//!
//! for addr in &addresses {
//!     println!("{}", addr);
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, stdin, BufRead, BufReader, Read};
use std::path::Path;

/// Buffer size for file reading
const BUFFER_SIZE: usize = 128 * 1024;

/// Whether a path names a gzip file (`.gz`, any case)
pub fn is_gzip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Open a file with automatic gzip detection based on file extension
///
/// Files ending in `.gz` are decompressed on the fly. The path `-` reads
/// from stdin.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead + Send>> {
    let path = path.as_ref();

    if path.to_str() == Some("-") {
        return Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, stdin())));
    }

    let file = File::open(path)?;
    Ok(from_file(file, is_gzip_path(path)))
}

/// Wrap an already-opened file, decompressing when `is_gzip` is set
pub fn from_file(file: File, is_gzip: bool) -> Box<dyn BufRead + Send> {
    if is_gzip {
        Box::new(BufReader::with_capacity(BUFFER_SIZE, GzDecoder::new(file)))
    } else {
        Box::new(BufReader::with_capacity(BUFFER_SIZE, file))
    }
}

/// Read a whole file into memory, decompressing `.gz` files
pub fn read_all(path: &Path) -> io::Result<Vec<u8>> {
    let mut data = Vec::new();
    from_file(File::open(path)?, is_gzip_path(path)).read_to_end(&mut data)?;
    Ok(data)
}

/// Collect one address per line
///
/// Surrounding whitespace is trimmed. Blank lines and lines starting with
/// `#` are skipped.
pub fn read_addresses<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut addresses = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        addresses.push(line.to_string());
    }
    Ok(addresses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_plain_text_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1.2.3.4").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "# resolver").unwrap();
        writeln!(file, "  8.8.8.8  ").unwrap();
        file.flush().unwrap();

        let addresses = read_addresses(open(file.path()).unwrap()).unwrap();
        assert_eq!(addresses, vec!["1.2.3.4", "8.8.8.8"]);
    }

    #[test]
    fn test_gzip_file() {
        let mut file = NamedTempFile::with_suffix(".GZ").unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        writeln!(encoder, "10.0.0.1").unwrap();
        writeln!(encoder, "10.0.0.2").unwrap();
        file.write_all(&encoder.finish().unwrap()).unwrap();
        file.flush().unwrap();

        let addresses = read_addresses(open(file.path()).unwrap()).unwrap();
        assert_eq!(addresses, vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn test_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let addresses = read_addresses(open(file.path()).unwrap()).unwrap();
        assert!(addresses.is_empty());
    }

    #[test]
    fn test_read_all_decompresses() {
        let mut file = NamedTempFile::with_suffix(".dat.gz").unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[0, 1, 2, 0xFF]).unwrap();
        file.write_all(&encoder.finish().unwrap()).unwrap();
        file.flush().unwrap();

        assert_eq!(read_all(file.path()).unwrap(), vec![0, 1, 2, 0xFF]);
    }

    #[test]
    fn test_is_gzip_path() {
        assert!(is_gzip_path(Path::new("qqwry.dat.gz")));
        assert!(is_gzip_path(Path::new("list.GZ")));
        assert!(!is_gzip_path(Path::new("qqwry.dat")));
        assert!(!is_gzip_path(Path::new("gz")));
    }
}
