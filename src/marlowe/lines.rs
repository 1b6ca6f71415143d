//! Line Normalizer
//!
//! Turns the raw report stream into stripped, numbered lines. Blank lines and page headers are
//! dropped. The reader keeps the last delivered line so a caller can [`hold`](LineReader::hold)
//! it and receive it again on the next pull; the separator uses this to re-read a boundary line
//! after handing back the block it closed.
//!
//! Bytes that are not valid UTF-8 are replaced with U+FFFD instead of failing the read.

use std::borrow::Cow;
use std::io::{self, BufRead};
use tracing::debug;

/// Page headers start with the Fortran form-feed carriage control followed by the program name.
pub const PAGE_HEADER_PREFIX: &str = "1MARLOWE";

/// A stripped, non-blank line and its 1-based position in the raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub number: usize,
    pub text: String,
}

impl RawLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        RawLine {
            number,
            text: text.into(),
        }
    }
}

/// Is this stripped line something the normalizer discards?
pub fn is_noise(stripped: &str) -> bool {
    stripped.is_empty() || stripped.starts_with(PAGE_HEADER_PREFIX)
}

/// Lazy normalized view over a buffered reader.
pub struct LineReader<R> {
    source: R,
    buf: Vec<u8>,
    consumed: usize,
    last: Option<RawLine>,
    held: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        LineReader {
            source: reader,
            buf: Vec::new(),
            consumed: 0,
            last: None,
            held: false,
        }
    }

    /// Re-deliver the most recently returned line on the next pull.
    ///
    /// Holding twice in a row still delivers the line once; holding before any line was read
    /// has no effect.
    pub fn hold(&mut self) {
        if self.last.is_some() {
            self.held = true;
        }
    }

    /// Number of raw lines consumed so far, including discarded ones.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Next raw line, terminator included, decoded lossily.
    fn read_raw(&mut self) -> Option<io::Result<String>> {
        self.buf.clear();
        match self.source.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let text = match String::from_utf8_lossy(&self.buf) {
                    Cow::Borrowed(text) => text.to_string(),
                    Cow::Owned(text) => {
                        debug!(line = self.consumed + 1, "invalid UTF-8 replaced");
                        text
                    }
                };
                Some(Ok(text))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

impl<'a> LineReader<io::Cursor<&'a [u8]>> {
    pub fn from_text(text: &'a str) -> Self {
        LineReader::new(io::Cursor::new(text.as_bytes()))
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<RawLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.held {
            self.held = false;
            return self.last.clone().map(Ok);
        }
        loop {
            let raw = match self.read_raw()? {
                Ok(raw) => raw,
                Err(err) => return Some(Err(err)),
            };
            self.consumed += 1;
            let stripped = raw.trim();
            if is_noise(stripped) {
                continue;
            }
            let line = RawLine::new(self.consumed, stripped);
            self.last = Some(line.clone());
            return Some(Ok(line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(reader: LineReader<impl BufRead>) -> Vec<(usize, String)> {
        reader
            .map(|line| line.unwrap())
            .map(|line| (line.number, line.text))
            .collect()
    }

    #[test]
    fn strips_and_drops_blank_lines() {
        let reader = LineReader::from_text("   Cascade Summary  \n\n   \nCollisions   12\n");
        assert_eq!(
            texts(reader),
            vec![
                (1, "Cascade Summary".to_string()),
                (4, "Collisions   12".to_string())
            ]
        );
    }

    #[test]
    fn drops_page_headers() {
        let reader =
            LineReader::from_text("1MARLOWE 15b      Page    2\nRecoil Ranges\n 1MARLOWE 15b Page 3\n");
        assert_eq!(texts(reader), vec![(2, "Recoil Ranges".to_string())]);
    }

    #[test]
    fn hold_redelivers_last_line_once() {
        let mut reader = LineReader::from_text("a\nb\n");
        assert_eq!(reader.next().unwrap().unwrap().text, "a");
        reader.hold();
        reader.hold();
        assert_eq!(reader.next().unwrap().unwrap().text, "a");
        assert_eq!(reader.next().unwrap().unwrap().text, "b");
        assert!(reader.next().is_none());
    }

    #[test]
    fn hold_before_first_line_is_ignored() {
        let mut reader = LineReader::from_text("a\n");
        reader.hold();
        assert_eq!(reader.next().unwrap().unwrap().text, "a");
        assert!(reader.next().is_none());
    }

    #[test]
    fn hold_at_end_of_input_redelivers() {
        let mut reader = LineReader::from_text("only\n");
        assert_eq!(reader.next().unwrap().unwrap().text, "only");
        assert!(reader.next().is_none());
        reader.hold();
        assert_eq!(reader.next().unwrap().unwrap().number, 1);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let reader = LineReader::new(io::Cursor::new(&b"Title: Caf\xC5 run\r\nnext\n"[..]));
        assert_eq!(
            texts(reader),
            vec![
                (1, "Title: Caf\u{FFFD} run".to_string()),
                (2, "next".to_string())
            ]
        );
    }

    #[test]
    fn last_line_without_newline() {
        let reader = LineReader::from_text("a\nb");
        assert_eq!(
            texts(reader),
            vec![(1, "a".to_string()), (2, "b".to_string())]
        );
    }

    #[test]
    fn counts_consumed_lines() {
        let mut reader = LineReader::from_text("\n\nx\n\n");
        while reader.next().is_some() {}
        assert_eq!(reader.consumed(), 4);
    }
}
