//! Statement segmentation
//!
//! The comment-filtered input is split on `;`, `{` and `}` into statements.
//! Each statement remembers the brace depth reached after its own delimiter.
//!
//! The splitting runs on its own thread and hands statements over a
//! zero-capacity [`sync_channel`], so the producer and the parser take turns:
//! exactly one statement is in flight and the producer waits until it has
//! been taken.

use std::io::{self, BufRead, BufReader, Read};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread;

/// One `;`, `{` or `}` terminated statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Statement text with whitespace runs collapsed to single spaces
    pub text: String,
    /// Brace depth after this statement's delimiter was applied
    pub depth: i32,
}

impl Statement {
    fn from_bytes(bytes: &[u8], depth: i32) -> Self {
        let text = String::from_utf8_lossy(bytes)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        Self { text, depth }
    }
}

/// Consumer side of the statement handoff
pub struct Statements {
    rx: Receiver<Statement>,
    depth: i32,
}

impl Statements {
    /// Segment `input` on a scoped producer thread and hand the statement
    /// stream to `consume`.
    ///
    /// `consume` may stop early; the producer notices the closed channel and
    /// stops reading. A read error in the producer is returned once both
    /// sides have finished.
    pub fn scan<R, F, T>(input: R, consume: F) -> io::Result<T>
    where
        R: Read + Send,
        F: FnOnce(&mut Statements) -> T,
    {
        let (tx, rx) = sync_channel(0);

        thread::scope(|scope| {
            let producer = scope.spawn(move || segment(input, tx));

            let mut statements = Statements { rx, depth: 0 };
            let result = consume(&mut statements);
            drop(statements);

            match producer.join() {
                Ok(read_result) => read_result.map(|()| result),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        })
    }

    /// Brace depth reported with the most recently taken statement
    pub fn depth(&self) -> i32 {
        self.depth
    }
}

impl Iterator for Statements {
    type Item = Statement;

    fn next(&mut self) -> Option<Statement> {
        let statement = self.rx.recv().ok()?;
        self.depth = statement.depth;
        Some(statement)
    }
}

/// Producer loop: split `input` into statements and send them one at a time
fn segment<R: Read>(input: R, tx: SyncSender<Statement>) -> io::Result<()> {
    let mut reader = BufReader::new(input);
    let mut pending = Vec::new();
    let mut depth = 0;

    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if buf.is_empty() {
            break;
        }

        let len = buf.len();
        let mut start = 0;
        for (i, &b) in buf.iter().enumerate() {
            match b {
                b'{' => depth += 1,
                b'}' => depth -= 1,
                b';' => {}
                _ => continue,
            }
            pending.extend_from_slice(&buf[start..i]);
            start = i + 1;

            if tx.send(Statement::from_bytes(&pending, depth)).is_err() {
                // Consumer is done with us
                return Ok(());
            }
            pending.clear();
        }
        pending.extend_from_slice(&buf[start..]);
        reader.consume(len);
    }

    if pending.iter().any(|b| !b.is_ascii_whitespace()) {
        let _ = tx.send(Statement::from_bytes(&pending, depth));
    }

    Ok(())
}
