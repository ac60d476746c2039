//! Shared test utilities for the linelog integration harnesses.
//!
//! Import everything via `mod common; use common::*;` at the top of each
//! harness file.

// Each harness compiles its own copy of this module; not every harness uses
// every helper.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Read;

use linelog::{Event, Record};

/// A scripted readable source: each `read` call hands out exactly one
/// pre-arranged chunk, then EOF. Chunk boundaries are therefore fully under
/// test control, which is the whole point — real byte streams split lines
/// wherever they please.
pub struct ChunkSource {
    chunks: VecDeque<Vec<u8>>,
}

impl ChunkSource {
    pub fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
        }
    }
}

impl Read for ChunkSource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.chunks.pop_front() {
            None => Ok(0),
            Some(chunk) => {
                assert!(chunk.len() <= buf.len(), "scripted chunk exceeds read buffer");
                buf[..chunk.len()].copy_from_slice(&chunk);
                Ok(chunk.len())
            }
        }
    }
}

/// Build one wire-format line, newline included.
pub fn wire_line(date: &str, level: &str, msg: &str) -> String {
    format!("[{}] {} {}\n", date, level, msg)
}

/// Collect only the line records out of an event sequence.
pub fn records(events: &[Event]) -> Vec<&Record> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Line(record) => Some(record),
            Event::End => None,
        })
        .collect()
}

/// Count the end events in a sequence.
pub fn end_count(events: &[Event]) -> usize {
    events.iter().filter(|event| **event == Event::End).count()
}
