//! Output assembler - line-oriented C++ text buffer with retroactive insertion points
//!
//! The document under construction is an arena of buffers. Each buffer is an ordered list of segments: a
//! closed line, or a placeholder referring to another buffer in the arena. Placeholders are reserved early
//! (e.g. right after the preamble) and filled later by redirecting writes into them, which is how struct
//! definitions and function prototypes end up before the bodies that were emitted first.
//!
//! ## Notes
//! - Redirection is a stack: [`OutputAssembler::push_target`] must be paired with
//!   [`OutputAssembler::pop_target`] on every path. The root buffer can never be popped.
//! - Indentation depth is tracked per buffer, so a placeholder starts at depth 0 regardless of where it was
//!   reserved.

use std::fmt;

/// Handle of a buffer in the assembler's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferId(usize);

#[derive(Debug)]
enum Segment {
    Line(String),
    Placeholder(BufferId),
}

#[derive(Debug, Default)]
struct Buffer {
    segments: Vec<Segment>,
    /// The line currently being written (not yet closed).
    open: String,
    indent_level: usize,
}

#[derive(Debug)]
pub struct OutputAssembler {
    buffers: Vec<Buffer>,
    /// Write targets; the bottom entry is the root buffer.
    targets: Vec<BufferId>,
    indent_str: String,
}

impl Default for OutputAssembler {
    fn default() -> Self {
        Self::new(4)
    }
}

impl OutputAssembler {
    /// Create an assembler indenting with `indent_width` spaces per level.
    pub fn new(indent_width: usize) -> Self {
        Self {
            buffers: vec![Buffer::default()],
            targets: vec![BufferId(0)],
            indent_str: " ".repeat(indent_width),
        }
    }

    fn current_id(&self) -> BufferId {
        // The root target is never popped.
        self.targets.last().copied().unwrap_or(BufferId(0))
    }

    fn current(&mut self) -> &mut Buffer {
        let BufferId(idx) = self.current_id();
        &mut self.buffers[idx]
    }

    /// Append text to the open line. The first write to an empty line is prefixed with indentation.
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let level = self.current().indent_level;
        let indent = self.indent_str.repeat(level);
        let buf = self.current();
        if buf.open.is_empty() {
            buf.open.push_str(&indent);
        }
        buf.open.push_str(text);
    }

    /// Append text, then close the line.
    pub fn write_line(&mut self, text: &str) {
        self.write(text);
        self.end_line();
    }

    /// Close the open line (an empty open line becomes a blank line).
    pub fn end_line(&mut self) {
        let buf = self.current();
        let line = std::mem::take(&mut buf.open);
        buf.segments.push(Segment::Line(line));
    }

    /// Whether something has been written to the open line.
    pub fn line_is_open(&self) -> bool {
        let BufferId(idx) = self.current_id();
        !self.buffers[idx].open.is_empty()
    }

    pub fn indent(&mut self) {
        self.current().indent_level += 1;
    }

    pub fn dedent(&mut self) {
        let buf = self.current();
        if buf.indent_level > 0 {
            buf.indent_level -= 1;
        }
    }

    /// Reserve a nested buffer at the current position and return its handle.
    ///
    /// A partially written line is closed first so the placeholder sits between whole lines.
    pub fn insert_placeholder(&mut self) -> BufferId {
        if self.line_is_open() {
            self.end_line();
        }
        let id = BufferId(self.buffers.len());
        self.buffers.push(Buffer::default());
        self.current().segments.push(Segment::Placeholder(id));
        id
    }

    /// Redirect subsequent writes into `target`.
    pub fn push_target(&mut self, target: BufferId) {
        self.targets.push(target);
    }

    /// Restore the previous write target. The root target stays in place.
    pub fn pop_target(&mut self) {
        if self.targets.len() > 1 {
            self.targets.pop();
        }
    }

    /// Drop the most recently closed line of the current target, if the open line is still empty.
    ///
    /// Used to remove a section label when nothing was written below it.
    pub fn remove_line(&mut self) -> Option<String> {
        if self.line_is_open() {
            return None;
        }
        let buf = self.current();
        match buf.segments.last() {
            Some(Segment::Line(_)) => match buf.segments.pop() {
                Some(Segment::Line(line)) => Some(line),
                _ => None,
            },
            _ => None,
        }
    }

    /// Flatten the document into its final text.
    pub fn finish(self) -> String {
        self.to_string()
    }

    fn flatten(&self) -> String {
        let mut raw = String::new();
        // (buffer, next segment index)
        let mut stack = vec![(0usize, 0usize)];
        while let Some((buf_idx, seg_idx)) = stack.pop() {
            let buf = &self.buffers[buf_idx];
            match buf.segments.get(seg_idx) {
                Some(Segment::Line(line)) => {
                    raw.push_str(line);
                    raw.push('\n');
                    stack.push((buf_idx, seg_idx + 1));
                }
                Some(Segment::Placeholder(BufferId(nested))) => {
                    stack.push((buf_idx, seg_idx + 1));
                    stack.push((*nested, 0));
                }
                None => {
                    if !buf.open.is_empty() {
                        raw.push_str(&buf.open);
                        raw.push('\n');
                    }
                }
            }
        }
        normalize_blank_lines(&raw)
    }
}

impl fmt::Display for OutputAssembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flatten())
    }
}

/// Collapse runs of blank lines into one and end the text with exactly one newline.
fn normalize_blank_lines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut newlines = 0;
    for ch in raw.chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(ch);
            }
        } else {
            newlines = 0;
            out.push(ch);
        }
    }
    let trimmed = out.trim_end_matches('\n').len();
    out.truncate(trimmed);
    out.push('\n');
    out
}
