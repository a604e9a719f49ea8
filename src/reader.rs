use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Reads a source file line by line as strict UTF-8.
///
/// A line ends at `\n`, `\r\n` or a lone `\r`; the terminator is not part of
/// the line. Invalid UTF-8 surfaces as `ErrorKind::InvalidData`.
pub struct SourceLines {
    reader: BufReader<Box<dyn Read + Send>>,
    buffer: Vec<u8>,
    line_number: u64,
    /// Set after a `\r` so a directly following `\n` is swallowed.
    skip_lf: bool,
}

impl SourceLines {
    fn new(file: fs::File) -> Self {
        Self::from_reader(Box::new(file))
    }

    fn from_reader(reader: Box<dyn Read + Send>) -> Self {
        Self {
            reader: BufReader::new(reader),
            buffer: Vec::with_capacity(8 * 1024),
            line_number: 0,
            skip_lf: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_reader<R: Read + Send + 'static>(reader: R) -> Self {
        Self::from_reader(Box::new(reader))
    }

    /// Fills `buffer` with the next line's bytes. Returns `false` at end of
    /// input when no line remains.
    fn read_line_bytes(&mut self) -> io::Result<bool> {
        self.buffer.clear();
        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if available.is_empty() {
                return Ok(!self.buffer.is_empty());
            }

            if self.skip_lf {
                self.skip_lf = false;
                if available[0] == b'\n' {
                    self.reader.consume(1);
                    continue;
                }
            }

            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(pos) => {
                    self.skip_lf = available[pos] == b'\r';
                    self.buffer.extend_from_slice(&available[..pos]);
                    self.reader.consume(pos + 1);
                    return Ok(true);
                }
                None => {
                    let len = available.len();
                    self.buffer.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }
    }
}

impl Iterator for SourceLines {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_line_bytes() {
            Ok(false) => None,
            Ok(true) => {
                self.line_number += 1;
                let line = std::str::from_utf8(&self.buffer)
                    .map(str::to_owned)
                    .map_err(|err| {
                        io::Error::new(
                            io::ErrorKind::InvalidData,
                            format!("line {} is not valid UTF-8: {}", self.line_number, err),
                        )
                    });
                Some(line)
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Opens `file_path` for line-by-line reading.
pub fn read_source_lines(file_path: &Path) -> io::Result<SourceLines> {
    let file = fs::File::open(file_path)?;
    Ok(SourceLines::new(file))
}
