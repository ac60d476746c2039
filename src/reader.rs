use std::{
    collections::VecDeque,
    io::Read,
    sync::LazyLock,
};

use chrono::NaiveDateTime;
use regex::Regex;

use crate::level::Level;
use crate::logger::DEFAULT_DATETIME_FORMAT;

// `[<date>] <SEVERITY> <message>`: the date token is everything between the
// first bracket pair, the severity is one contiguous word, the message is
// the rest of the line.
static LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\] (\w+) (.*)$").expect("line grammar regex"));

const CHUNK_SIZE: usize = 8 * 1024;

/// One parsed wire-format line.
///
/// Parsing is best-effort: an unrecognized severity token or an unparseable
/// date token does not fail the line. The record is still produced, with the
/// typed field left empty and the raw token preserved in `level_str`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub date: Option<NaiveDateTime>,
    pub level: Option<Level>,
    pub level_str: String,
    pub msg: String,
}

/// Item of the record stream: one `Line` per parsed record, then exactly one
/// `End` when the source is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Line(Record),
    End,
}

/// Chunk-buffering line parser.
///
/// Chunk boundaries from a byte stream are not guaranteed to align with line
/// boundaries, so incoming text is buffered until at least one newline has
/// arrived; only newline-terminated lines are ever parsed. Text after the
/// last newline of a chunk stays buffered until a later chunk completes it.
pub struct Reader {
    buf: String,
    datetime_format: String,
    ended: bool,
}

impl Reader {
    pub fn new() -> Self {
        Self {
            buf: String::new(),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            ended: false,
        }
    }

    /// Override the format used to parse the date token. Must match whatever
    /// the producing side writes; tokens that do not parse yield
    /// `date: None`.
    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = format.into();
        self
    }

    /// Push one chunk of text and collect the records completed by it, in
    /// input order.
    ///
    /// Lines that do not match the grammar at all are silently skipped; a
    /// log stream may contain incidental non-log lines.
    pub fn feed(&mut self, chunk: &str) -> Vec<Record> {
        self.buf.push_str(chunk);

        // Nothing is parseable until a newline arrives.
        let Some(last_newline) = self.buf.rfind('\n') else {
            return Vec::new();
        };

        let rest = self.buf.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buf, rest);

        complete
            .split('\n')
            .filter(|line| !line.is_empty())
            .filter_map(|line| self.parse_line(line))
            .collect()
    }

    /// Signal end-of-data. Returns `Some(Event::End)` exactly once; any
    /// buffered partial line is dropped, since it was never completed.
    pub fn end(&mut self) -> Option<Event> {
        if self.ended {
            return None;
        }
        self.ended = true;
        Some(Event::End)
    }

    /// Consume a readable source, yielding `Event::Line` per record and one
    /// final `Event::End` at end-of-data. Bytes are converted lossily to
    /// UTF-8; a multibyte sequence split across reads is held back until its
    /// remaining bytes arrive. The source is never closed by the reader.
    pub fn events<R: Read>(self, source: R) -> Events<R> {
        Events {
            reader: self,
            source,
            queue: VecDeque::new(),
            carry: Vec::new(),
            done: false,
        }
    }

    fn parse_line(&self, line: &str) -> Option<Record> {
        let captures = LINE_RE.captures(line)?;

        let date_token = &captures[1];
        let level_str = captures[2].to_string();

        Some(Record {
            date: NaiveDateTime::parse_from_str(date_token, &self.datetime_format).ok(),
            level: Level::from_name(&level_str),
            level_str,
            msg: captures[3].to_string(),
        })
    }
}

impl Default for Reader {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the events of a readable source.
pub struct Events<R> {
    reader: Reader,
    source: R,
    queue: VecDeque<Record>,
    // Trailing bytes of a UTF-8 sequence whose remainder has not arrived.
    carry: Vec<u8>,
    done: bool,
}

impl<R> Events<R> {
    fn decode(&mut self, bytes: &[u8]) -> String {
        self.carry.extend_from_slice(bytes);

        // Read boundaries fall wherever the source pleases, including inside
        // a multibyte codepoint. Hold back an incomplete trailing sequence
        // so it is decoded together with its remaining bytes.
        let split = self.carry.len() - incomplete_suffix_len(&self.carry);
        let text = String::from_utf8_lossy(&self.carry[..split]).into_owned();
        self.carry.drain(..split);
        text
    }

    fn flush_carry(&mut self) -> String {
        // End-of-data: whatever is held back can never be completed, so it
        // decodes lossily.
        let text = String::from_utf8_lossy(&self.carry).into_owned();
        self.carry.clear();
        text
    }
}

impl<R: Read> Iterator for Events<R> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        loop {
            if let Some(record) = self.queue.pop_front() {
                return Some(Event::Line(record));
            }

            if self.done {
                return self.reader.end();
            }

            let mut chunk = [0u8; CHUNK_SIZE];
            match self.source.read(&mut chunk) {
                Ok(0) => {
                    self.done = true;
                    let text = self.flush_carry();
                    self.queue.extend(self.reader.feed(&text));
                }
                Ok(n) => {
                    let text = self.decode(&chunk[..n]);
                    self.queue.extend(self.reader.feed(&text));
                }
                // Best-effort stream: a read failure is end-of-data.
                Err(_) => {
                    self.done = true;
                    let text = self.flush_carry();
                    self.queue.extend(self.reader.feed(&text));
                }
            }
        }
    }
}

/// Length of an incomplete UTF-8 sequence at the end of `buf`, 0 if the
/// buffer ends on a codepoint boundary (or in bytes no suffix can complete).
fn incomplete_suffix_len(buf: &[u8]) -> usize {
    let len = buf.len();
    let start = len.saturating_sub(4);

    for i in (start..len).rev() {
        let byte = buf[i];
        if byte < 0x80 {
            return 0;
        }
        if byte >= 0xC0 {
            let need = match byte {
                0xF0..=0xFF => 4,
                0xE0..=0xEF => 3,
                _ => 2,
            };
            return if len - i < need { len - i } else { 0 };
        }
        // Continuation byte, keep walking back to the leading byte.
    }

    0
}
