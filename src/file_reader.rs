//! Shard file reader with automatic gzip decompression
//!
//! Article shards and listing files may be stored plain or gzip-compressed.
//! Files ending in `.gz` (case-insensitive) are decompressed transparently.
//!
//! ```rust,no_run
//! use newsagg::file_reader;
//! use std::io::BufRead;
//!
//! let reader = file_reader::open("shard-0001.json.gz")?;
//! for line in reader.lines() {
//!     println!("{}", line?);
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Buffer size for file reading (128KB)
const BUFFER_SIZE: usize = 128 * 1024;

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Open a file with automatic gzip detection based on file extension
///
/// # Errors
///
/// Returns an error if the file doesn't exist or cannot be opened.
/// Invalid gzip data surfaces later, on read.
pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead + Send>> {
    let path = path.as_ref();
    let file = File::open(path)?;

    if is_gzip(path) {
        let decoder = GzDecoder::new(file);
        Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, decoder)))
    } else {
        Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, file)))
    }
}

/// Read a whole (possibly compressed) file into a string
pub fn read_to_string<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let mut reader = open(path)?;
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    Ok(content)
}
