//! Drive the progress scanner from a live byte stream

use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, error};

use super::stream::{ParseEvent, ParserOptions, StreamParser};
use crate::models::Counts;
use crate::output::GlyphSink;

const READ_BUF_SIZE: usize = 4096;

/// What a single stream produced
#[derive(Debug, Default)]
pub struct StreamReport {
    pub counts: Counts,
    pub extras: Vec<String>,
    pub glyphs: usize,
    /// Set when reading stopped on an error other than end of stream
    pub read_error: Option<io::Error>,
}

impl StreamReport {
    fn apply(&mut self, events: Vec<ParseEvent>, sink: &dyn GlyphSink) {
        for event in events {
            match event {
                ParseEvent::Glyph(glyph) => {
                    sink.glyph(glyph);
                    self.glyphs += 1;
                }
                ParseEvent::Extras(text) => self.extras.push(text),
                ParseEvent::Summary(line) => self.counts.record(&line),
            }
        }
    }
}

/// Read `reader` to the end, printing glyphs as they arrive and collecting
/// summary counts locally.
///
/// A read error stops this stream only; whatever was parsed before it is
/// kept in the report.
pub async fn read_progress<R>(
    mut reader: R,
    options: ParserOptions,
    sink: &dyn GlyphSink,
) -> StreamReport
where
    R: AsyncRead + Unpin,
{
    let mut parser = StreamParser::new(options);
    let mut report = StreamReport::default();
    let mut buf = vec![0u8; READ_BUF_SIZE];

    loop {
        match reader.read(&mut buf).await {
            Ok(0) => {
                report.apply(parser.finish(), sink);
                break;
            }
            Ok(n) => report.apply(parser.feed(&buf[..n]), sink),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                error!("Unknown error while processing output: {}", e);
                report.read_error = Some(e);
                break;
            }
        }
    }

    debug!(
        "Stream finished: {} glyphs, {} scenarios, {} steps",
        report.glyphs, report.counts.scenarios, report.counts.steps
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Glyph;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        glyphs: Mutex<Vec<Glyph>>,
    }

    impl GlyphSink for RecordingSink {
        fn glyph(&self, glyph: Glyph) {
            self.glyphs.lock().unwrap().push(glyph);
        }
    }

    #[tokio::test]
    async fn test_read_progress_split_reads() {
        let reader = tokio_test::io::Builder::new()
            .read(b"..F")
            .read(b".\n")
            .read(b"\n1 scenario (1 failed)\n4 st")
            .read(b"eps (3 passed, 1 failed)\n")
            .build();
        let sink = RecordingSink::default();

        let report = read_progress(reader, ParserOptions::default(), &sink).await;

        assert!(report.read_error.is_none());
        assert_eq!(report.glyphs, 4);
        assert_eq!(
            *sink.glyphs.lock().unwrap(),
            vec![Glyph::Passed, Glyph::Passed, Glyph::Failed, Glyph::Passed]
        );
        assert_eq!(report.counts.scenarios, 1);
        assert_eq!(report.counts.scenarios_failed, 1);
        assert_eq!(report.counts.steps, 4);
        assert_eq!(report.counts.steps_passed, 3);
    }

    #[tokio::test]
    async fn test_read_error_keeps_partial_counts() {
        let reader = tokio_test::io::Builder::new()
            .read(b"..\n\n2 scenarios (2 passed)\n")
            .read_error(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
            .build();
        let sink = RecordingSink::default();

        let report = read_progress(reader, ParserOptions::default(), &sink).await;

        assert_eq!(
            report.read_error.as_ref().map(|e| e.kind()),
            Some(io::ErrorKind::BrokenPipe)
        );
        assert_eq!(report.counts.scenarios, 2);
        assert_eq!(report.counts.scenarios_passed, 2);
        assert_eq!(report.counts.steps, 0);
        assert_eq!(report.glyphs, 2);
    }

    #[tokio::test]
    async fn test_extras_reported() {
        let reader = tokio_test::io::Builder::new()
            .read(b"U\n\n--- Undefined step\n\n1 step (1 undefined)\n")
            .build();
        let sink = RecordingSink::default();

        let report = read_progress(reader, ParserOptions::default(), &sink).await;
        assert_eq!(report.extras, vec!["--- Undefined step\n".to_string()]);
        assert_eq!(report.counts.steps, 1);
    }
}
