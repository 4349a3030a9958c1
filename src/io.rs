use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Embedded text sits near the start of the file; reading stops here.
pub const DEFAULT_PREFIX_CAP: usize = 2_000_000;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Reads at most `cap` bytes from `reader`.
///
/// Hitting the cap is not an error: the source is simply abandoned, and the
/// decoder treats the result as a truncated stream.
pub fn read_prefix<R: Read>(mut reader: R, cap: usize) -> io::Result<Vec<u8>> {
    let mut data = Vec::with_capacity(cap.min(READ_BUFFER_SIZE));
    let mut buffer = vec![0u8; READ_BUFFER_SIZE.min(cap.max(1))];

    while data.len() < cap {
        let want = (cap - data.len()).min(buffer.len());
        match reader.read(&mut buffer[..want]) {
            Ok(0) => break,
            Ok(n) => data.extend_from_slice(&buffer[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(data)
}

pub fn read_file_prefix(path: &Path, cap: usize) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    read_prefix(file, cap)
}
