//! Batch pipeline: input lines in, label layouts and diagnostics out.
//!
//! ```text
//! line
//!     ↓
//! [record::parse]   → Rejected(MissingCode)
//!     ↓
//! [sscc::validate]  → Rejected(WrongLength | NonDigitCharacter | CheckDigitMismatch)
//!     ↓
//! [LabelBuilder]
//!     ↓
//! Accepted(LabelLayout)
//! ```
//!
//! A rejected line is logged and recorded, never fatal. Lines are handled
//! strictly one after another, in input order.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, RejectReason, Result};
use crate::layout::{LabelBuilder, LabelLayout, TextMetrics};
use crate::record;
use crate::sscc;

/// Accepted-line ceiling used when none is configured.
pub const DEFAULT_MAX_LINES: usize = 1000;

/// A skipped input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number
    pub line_number: usize,
    /// Line content without its terminator
    pub content: String,
    /// Why it was skipped
    pub reason: RejectReason,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line_number, self.reason, self.content)
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    /// Accepted layouts, in input order
    pub layouts: Vec<LabelLayout>,
    /// Rejected lines, in line order
    pub diagnostics: Vec<Diagnostic>,
    /// Lines processed (accepted + rejected)
    pub lines_read: usize,
    /// Whether input was left unread because the ceiling was reached
    pub ceiling_reached: bool,
}

impl BatchResult {
    /// Number of accepted lines.
    pub fn accepted(&self) -> usize {
        self.layouts.len()
    }

    /// Number of rejected lines.
    pub fn rejected(&self) -> usize {
        self.diagnostics.len()
    }

    /// Rejection counts by kind, sorted by kind name.
    pub fn rejections_by_kind(&self) -> Vec<(&'static str, usize)> {
        let mut counts = std::collections::BTreeMap::new();
        for d in &self.diagnostics {
            *counts.entry(d.reason.kind()).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }
}

/// Routes lines through parsing, validation and layout.
#[derive(Debug, Clone)]
pub struct BatchPipeline<M> {
    builder: LabelBuilder<M>,
}

impl<M: TextMetrics> BatchPipeline<M> {
    /// Create a pipeline that lays out labels with `builder`.
    pub fn new(builder: LabelBuilder<M>) -> Self {
        Self { builder }
    }

    /// The label builder in use.
    pub fn builder(&self) -> &LabelBuilder<M> {
        &self.builder
    }

    /// Take one line from text to layout.
    pub fn process_line(
        &self,
        line: &str,
        page_width: f32,
        page_height: f32,
    ) -> std::result::Result<LabelLayout, RejectReason> {
        let record = record::parse(line)?;
        let code = sscc::validate(&record.code)?;
        Ok(self
            .builder
            .build(code, record.pallet, record.item, page_width, page_height))
    }

    /// Process a sequence of lines.
    ///
    /// `max_lines` caps the number of accepted lines; `None` means no cap.
    pub fn run<I, S>(
        &self,
        lines: I,
        page_width: f32,
        page_height: f32,
        max_lines: Option<usize>,
    ) -> BatchResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut batch = Batch::new(max_lines);
        for line in lines {
            if batch.is_full() {
                batch.result.ceiling_reached = true;
                break;
            }
            batch.record(line.as_ref(), self.process_line(line.as_ref(), page_width, page_height));
        }
        batch.finish()
    }

    /// Process lines from a reader.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD and the line
    /// is validated as usual. A read error aborts the run.
    pub fn run_reader<R: BufRead>(
        &self,
        reader: R,
        page_width: f32,
        page_height: f32,
        max_lines: Option<usize>,
    ) -> Result<BatchResult> {
        self.run_reader_with(reader, page_width, page_height, max_lines, |_| Ok(None))
    }

    /// Process lines from a reader, handing each accepted layout to `sink`
    /// before the next line is read.
    ///
    /// `sink` returns `Ok(None)` to keep the layout, `Ok(Some(reason))` to
    /// turn it into a rejection, or an error to abort the run.
    pub fn run_reader_with<R, F>(
        &self,
        mut reader: R,
        page_width: f32,
        page_height: f32,
        max_lines: Option<usize>,
        mut sink: F,
    ) -> Result<BatchResult>
    where
        R: BufRead,
        F: FnMut(&LabelLayout) -> Result<Option<RejectReason>>,
    {
        let mut batch = Batch::new(max_lines);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            if batch.is_full() {
                batch.result.ceiling_reached = true;
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            let outcome = match self.process_line(&line, page_width, page_height) {
                Ok(layout) => match sink(&layout)? {
                    None => Ok(layout),
                    Some(reason) => Err(reason),
                },
                Err(reason) => Err(reason),
            };
            batch.record(&line, outcome);
        }
        Ok(batch.finish())
    }

    /// Process the lines of a file.
    pub fn run_file(
        &self,
        path: impl AsRef<Path>,
        page_width: f32,
        page_height: f32,
        max_lines: Option<usize>,
    ) -> Result<BatchResult> {
        self.run_file_with(path, page_width, page_height, max_lines, |_| Ok(None))
    }

    /// [`run_reader_with`](Self::run_reader_with) over the lines of a file.
    pub fn run_file_with<F>(
        &self,
        path: impl AsRef<Path>,
        page_width: f32,
        page_height: f32,
        max_lines: Option<usize>,
        sink: F,
    ) -> Result<BatchResult>
    where
        F: FnMut(&LabelLayout) -> Result<Option<RejectReason>>,
    {
        let path = path.as_ref();
        let unreadable = |source| Error::InputUnreadable {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(unreadable)?;
        log::debug!("Reading records from {}", path.display());

        match self.run_reader_with(BufReader::new(file), page_width, page_height, max_lines, sink) {
            Err(Error::Io(source)) => Err(unreadable(source)),
            other => other,
        }
    }
}

/// Accumulates a [`BatchResult`] line by line.
struct Batch {
    result: BatchResult,
    max_lines: Option<usize>,
}

impl Batch {
    fn new(max_lines: Option<usize>) -> Self {
        Self {
            result: BatchResult::default(),
            max_lines,
        }
    }

    fn is_full(&self) -> bool {
        self.max_lines
            .map_or(false, |max| self.result.layouts.len() >= max)
    }

    fn record(&mut self, line: &str, outcome: std::result::Result<LabelLayout, RejectReason>) {
        self.result.lines_read += 1;
        let line_number = self.result.lines_read;
        match outcome {
            Ok(layout) => {
                log::debug!("line {}: accepted {}", line_number, layout.code);
                self.result.layouts.push(layout);
            },
            Err(reason) => {
                let content = record::strip_line_terminator(line).to_string();
                log::warn!("Skipping line {}: {} ({:?})", line_number, reason, content);
                self.result.diagnostics.push(Diagnostic {
                    line_number,
                    content,
                    reason,
                });
            },
        }
    }

    fn finish(self) -> BatchResult {
        let result = self.result;
        if result.ceiling_reached {
            log::warn!(
                "Stopped after {} accepted lines (line ceiling reached)",
                result.accepted()
            );
        }
        log::info!(
            "Processed {} lines: {} accepted, {} rejected",
            result.lines_read,
            result.accepted(),
            result.rejected()
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ParseError;
    use crate::sscc::InvalidCodeReason;
    use crate::writer::FontManager;
    use std::io::Cursor;

    const W: f32 = 419.527_56;
    const H: f32 = 297.637_8;

    fn pipeline() -> BatchPipeline<FontManager> {
        BatchPipeline::new(LabelBuilder::new(FontManager::new()))
    }

    #[test]
    fn test_process_line_accepts_valid_code() {
        let layout = pipeline()
            .process_line("34012345678901234560,PAL001,Widget A\n", W, H)
            .unwrap();
        assert_eq!(layout.human_readable(), "(34)012345678901234560");
        assert_eq!(layout.auxiliary.len(), 2);
    }

    #[test]
    fn test_process_line_rejections() {
        let p = pipeline();
        assert_eq!(
            p.process_line("", W, H),
            Err(RejectReason::Parse(ParseError::MissingCode))
        );
        assert_eq!(
            p.process_line("340123456789012345675\n", W, H),
            Err(RejectReason::InvalidCode(InvalidCodeReason::WrongLength { length: 21 }))
        );
        assert_eq!(
            p.process_line("0012345678901234567X", W, H),
            Err(RejectReason::InvalidCode(InvalidCodeReason::NonDigitCharacter {
                position: 19,
                found: 'X'
            }))
        );
        assert_eq!(
            p.process_line("34012345678901234567", W, H),
            Err(RejectReason::InvalidCode(InvalidCodeReason::CheckDigitMismatch {
                expected: 0,
                found: 7
            }))
        );
    }

    #[test]
    fn test_run_mixed_lines() {
        let lines = [
            "00123456789012345675",
            "bad",
            "34012345678901234560,PAL001,Widget A",
            ",PAL002",
            "00350123450000000016",
        ];
        let result = pipeline().run(lines, W, H, None);

        assert_eq!(result.lines_read, 5);
        assert_eq!(result.accepted(), 3);
        assert_eq!(result.rejected(), 2);
        assert!(!result.ceiling_reached);

        let codes: Vec<&str> = result.layouts.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(
            codes,
            vec!["00123456789012345675", "34012345678901234560", "00350123450000000016"]
        );
        assert_eq!(result.diagnostics[0].line_number, 2);
        assert_eq!(result.diagnostics[0].content, "bad");
        assert_eq!(result.diagnostics[1].line_number, 4);
        assert_eq!(result.diagnostics[1].reason.kind(), "MissingCode");
        assert_eq!(result.rejections_by_kind(), vec![("MissingCode", 1), ("WrongLength", 1)]);
    }

    #[test]
    fn test_ceiling_counts_accepted_lines() {
        let lines = [
            "00123456789012345675",
            "bad",
            "34012345678901234560",
            "00350123450000000016",
        ];
        let result = pipeline().run(lines, W, H, Some(2));
        assert_eq!(result.accepted(), 2);
        assert_eq!(result.rejected(), 1);
        assert_eq!(result.lines_read, 3);
        assert!(result.ceiling_reached);
    }

    #[test]
    fn test_ceiling_not_reached_when_input_ends() {
        let result = pipeline().run(["00123456789012345675"], W, H, Some(1));
        assert_eq!(result.accepted(), 1);
        assert!(!result.ceiling_reached);
    }

    #[test]
    fn test_run_reader_lossy_utf8() {
        let input: &[u8] = b"00123456789012345675\n\xFF0123456789012345675\r\n34012345678901234560\n";
        let result = pipeline().run_reader(Cursor::new(input), W, H, None).unwrap();
        assert_eq!(result.accepted(), 2);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].line_number, 2);
        assert_eq!(result.diagnostics[0].reason.kind(), "NonDigitCharacter");
        assert_eq!(result.diagnostics[0].content, "\u{FFFD}0123456789012345675");
    }

    #[test]
    fn test_run_reader_blank_lines_are_missing_code() {
        let result = pipeline()
            .run_reader(Cursor::new("\n00123456789012345675\n\n"), W, H, None)
            .unwrap();
        assert_eq!(result.lines_read, 3);
        assert_eq!(result.accepted(), 1);
        assert!(result.diagnostics.iter().all(|d| d.reason.kind() == "MissingCode"));
    }

    #[test]
    fn test_sink_can_reject_and_abort() {
        let input = "00123456789012345675\n34012345678901234560\n";
        let result = pipeline()
            .run_reader_with(Cursor::new(input), W, H, None, |layout| {
                Ok((layout.code.as_str() == "34012345678901234560")
                    .then(|| RejectReason::Rendering("encoder failed".to_string())))
            })
            .unwrap();
        assert_eq!(result.accepted(), 1);
        assert_eq!(result.diagnostics[0].reason.kind(), "RenderingError");
        assert_eq!(result.diagnostics[0].line_number, 2);

        let err = pipeline()
            .run_reader_with(Cursor::new(input), W, H, None, |layout| {
                Err(Error::Rendering {
                    code: layout.code.to_string(),
                    reason: "boom".to_string(),
                })
            })
            .unwrap_err();
        assert!(matches!(err, Error::Rendering { .. }));
    }

    #[test]
    fn test_run_file_missing_is_fatal() {
        let err = pipeline()
            .run_file("/nonexistent/input.csv", W, H, None)
            .unwrap_err();
        assert!(matches!(err, Error::InputUnreadable { .. }));
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic {
            line_number: 7,
            content: "abc".to_string(),
            reason: RejectReason::from(InvalidCodeReason::WrongLength { length: 3 }),
        };
        let text = d.to_string();
        assert!(text.starts_with("line 7: "));
        assert!(text.contains("\"abc\""));
    }
}
