//! Comment stripping reader
//!
//! [`CommentFilter`] wraps any [`Read`] and drops every region between a
//! comment-start and a comment-end marker, except inside string literals.
//! Java sources need two chained filters (`/* */` then `//` to end of line);
//! javap dumps use the same machinery to drop `Compiled from` and
//! `Signature:` lines.
//!
//! The input is cut into chunks, each starting at a marker occurrence and
//! running up to the next one. The marker that starts a chunk drives the
//! state machine:
//!
//! | marker        | in data      | in comment   | in literal   |
//! |---------------|--------------|--------------|--------------|
//! | comment start | → comment    | stay         | stay         |
//! | comment end   | stay         | → data, drop marker | stay  |
//! | literal       | → literal    | stay         | → data       |

use std::io::{self, Read};

const READ_CHUNK: usize = 8 * 1024;

/// Markers configuring a [`CommentFilter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentMarkers {
    pub start: String,
    pub end: String,
    /// String-literal delimiter
    pub literal: String,
    /// Escape sequence that stops a literal delimiter from toggling state;
    /// empty for none
    pub escape: String,
}

impl CommentMarkers {
    pub fn new(start: &str, end: &str, literal: &str, escape: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
            literal: literal.to_string(),
            escape: escape.to_string(),
        }
    }

    /// `/* ... */` block comments
    pub fn java_block() -> Self {
        Self::new("/*", "*/", "\"", "\\")
    }

    /// `// ...` line comments
    pub fn java_line() -> Self {
        Self::new("//", "\n", "\"", "\\")
    }

    /// A javap line starting with `prefix`, up to the end of line
    pub fn javap_line(prefix: &str) -> Self {
        Self::new(prefix, "\n", "\"", "\\")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Data,
    Comment,
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Start,
    End,
    Literal,
}

/// A [`Read`] adapter removing comments from the wrapped reader
pub struct CommentFilter<R> {
    inner: R,
    markers: CommentMarkers,
    state: State,
    /// Marker the pending input starts with, if any
    next_marker: Option<Marker>,
    /// Input read but not yet cut into chunks
    pending: Vec<u8>,
    /// Filtered bytes not yet handed out
    out: Vec<u8>,
    out_pos: usize,
    eof: bool,
}

impl<R: Read> CommentFilter<R> {
    pub fn new(markers: CommentMarkers, inner: R) -> Self {
        Self {
            inner,
            markers,
            state: State::Data,
            next_marker: None,
            pending: Vec::new(),
            out: Vec::new(),
            out_pos: 0,
            eof: false,
        }
    }

    fn marker_bytes(&self, marker: Marker) -> &[u8] {
        match marker {
            Marker::Start => self.markers.start.as_bytes(),
            Marker::End => self.markers.end.as_bytes(),
            Marker::Literal => self.markers.literal.as_bytes(),
        }
    }

    /// Find the nearest marker in `search`. Ties go to start, then end, then
    /// literal.
    fn nearest_marker(&self, search: &[u8]) -> Option<(usize, Marker)> {
        let mut nearest: Option<(usize, Marker)> = None;

        for marker in [Marker::Start, Marker::End, Marker::Literal] {
            let needle = self.marker_bytes(marker);
            let found = if marker == Marker::Literal {
                self.find_unescaped(search, needle)
            } else {
                find(search, needle, 0)
            };
            if let Some(pos) = found {
                if nearest.is_none_or(|(best, _)| pos < best) {
                    nearest = Some((pos, marker));
                }
            }
        }

        nearest
    }

    fn find_unescaped(&self, search: &[u8], needle: &[u8]) -> Option<usize> {
        let escape = self.markers.escape.as_bytes();
        let mut from = 0;
        loop {
            let pos = find(search, needle, from)?;
            if escape.is_empty() || pos < escape.len() || &search[pos - escape.len()..pos] != escape
            {
                return Some(pos);
            }
            from = pos + needle.len();
        }
    }

    /// Cut the next chunk off `pending` and run it through the state machine.
    ///
    /// Returns `false` if more input is needed before a chunk can be cut.
    fn process_chunk(&mut self) -> bool {
        let offset = self
            .next_marker
            .map_or(0, |marker| self.marker_bytes(marker).len());

        let (len, following) = match self.nearest_marker(&self.pending[offset..]) {
            Some((pos, marker)) => (offset + pos, Some(marker)),
            None if self.eof => (self.pending.len(), None),
            None => return false,
        };

        let chunk: Vec<u8> = self.pending.drain(..len).collect();
        let mut emit = &chunk[..];

        match self.next_marker {
            Some(Marker::Start) => {
                if self.state != State::Literal {
                    self.state = State::Comment;
                }
            }
            Some(Marker::End) => {
                if self.state == State::Comment {
                    self.state = State::Data;
                    emit = &emit[self.markers.end.len()..];
                }
            }
            Some(Marker::Literal) => match self.state {
                State::Data => self.state = State::Literal,
                State::Literal => self.state = State::Data,
                State::Comment => {}
            },
            None => {}
        }

        if self.state != State::Comment {
            self.out.extend_from_slice(emit);
        }

        self.next_marker = following;
        true
    }

    /// Produce more filtered output. Returns `false` once input is exhausted.
    fn fill(&mut self) -> io::Result<bool> {
        self.out.clear();
        self.out_pos = 0;

        while self.out.is_empty() {
            if self.eof && self.pending.is_empty() {
                return Ok(false);
            }
            if !self.process_chunk() {
                let mut buf = [0u8; READ_CHUNK];
                let n = self.inner.read(&mut buf)?;
                if n == 0 {
                    self.eof = true;
                } else {
                    self.pending.extend_from_slice(&buf[..n]);
                }
            }
        }

        Ok(true)
    }
}

impl<R: Read> Read for CommentFilter<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.out_pos >= self.out.len() && !self.fill()? {
            return Ok(0);
        }

        let available = &self.out[self.out_pos..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.out_pos += n;
        Ok(n)
    }
}

/// Position of `needle` in `haystack` at or after `from`. An empty needle
/// never matches.
fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(input: &str, markers: CommentMarkers) -> String {
        let mut out = String::new();
        CommentFilter::new(markers, input.as_bytes())
            .read_to_string(&mut out)
            .unwrap();
        out
    }

    /// Hands out one byte per read call, so markers straddle reads
    struct ByteReader<'a>(&'a [u8]);

    impl Read for ByteReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.split_first() {
                Some((b, rest)) if !buf.is_empty() => {
                    buf[0] = *b;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn test_comments_outside_literals() {
        let markers = CommentMarkers::new("/*", "*/", "\"", "");
        assert_eq!(filter(r#"a/*x"y*/b"c/*d*/e"f"#, markers), r#"ab"c/*d*/e"f"#);
    }

    #[test]
    fn test_escaped_literal_delimiter() {
        let input = r#"s = "a \" /* not a comment */ b"; /* gone */ t"#;
        assert_eq!(
            filter(input, CommentMarkers::java_block()),
            r#"s = "a \" /* not a comment */ b";  t"#
        );
    }

    #[test]
    fn test_line_comments() {
        let input = "int a; // first\nint b; // second\n";
        assert_eq!(filter(input, CommentMarkers::java_line()), "int a; int b; ");
    }

    #[test]
    fn test_chained_filters() {
        let input = "/** doc\n * // not a line comment */\npublic class Foo { // trailing\n}\n";
        let block = CommentFilter::new(CommentMarkers::java_block(), input.as_bytes());
        let mut line = CommentFilter::new(CommentMarkers::java_line(), block);
        let mut out = String::new();
        line.read_to_string(&mut out).unwrap();
        assert_eq!(out, "\npublic class Foo { }\n");
    }

    #[test]
    fn test_unterminated_comment_drops_rest() {
        assert_eq!(filter("keep /* lost forever", CommentMarkers::java_block()), "keep ");
    }

    #[test]
    fn test_markers_split_across_reads() {
        let input = b"Compiled from \"Foo.java\"\npublic class Foo {\n  Signature: #12\n}\n";
        let mut filter =
            CommentFilter::new(CommentMarkers::javap_line("Signature:"), ByteReader(input));
        let mut out = String::new();
        filter.read_to_string(&mut out).unwrap();
        assert_eq!(
            out,
            "Compiled from \"Foo.java\"\npublic class Foo {\n  }\n"
        );
    }

    #[test]
    fn test_small_output_buffer() {
        let mut filter = CommentFilter::new(
            CommentMarkers::java_block(),
            "ab/* c */de".as_bytes(),
        );
        let mut buf = [0u8; 1];
        let mut out = Vec::new();
        loop {
            let n = filter.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(out, b"abde");
    }
}
