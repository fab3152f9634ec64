//! Report sinks.
//!
//! Pixel compositing is left to whatever consumes the reports; these sinks
//! produce the overlay labels as text, or the full report as JSON lines.

use crate::pipeline::FrameReport;
use crate::Result;
use std::io::Write;

/// Consumer of per-frame reports
pub trait ReportSink {
    /// Emit one report
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails
    fn write_report(&mut self, report: &FrameReport) -> Result<()>;

    /// Flush buffered output
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Overlay labels for a frame, top to bottom
#[must_use]
pub fn overlay_lines(report: &FrameReport, show_finger_states: bool) -> Vec<String> {
    let mut lines = vec![format!("Total: {}", report.fingers.total)];
    lines.extend(
        report
            .fingers
            .per_hand
            .iter()
            .map(|(side, count)| format!("{side}: {count}")),
    );

    if show_finger_states {
        for (side, states) in &report.finger_states {
            let flags: String = [states.thumb, states.index, states.middle, states.ring, states.pinky]
                .iter()
                .map(|&up| if up { '1' } else { '0' })
                .collect();
            lines.push(format!("{side} digits: {flags}"));
        }
    }

    // the emotion label is anchored to the face box, no box means nothing to draw
    if let Some(bbox) = report.emotion.bbox {
        lines.push(format!(
            "Emotion: {} @ ({}, {}, {}x{})",
            report.emotion.emotion, bbox.x, bbox.y, bbox.width, bbox.height
        ));
    }
    if let Some(gesture) = report.gesture {
        lines.push(format!("Gesture: {gesture}"));
    }
    lines
}

/// Writes overlay labels as plain text, one block per frame
pub struct TextOverlay<W: Write> {
    writer: W,
    show_finger_states: bool,
}

impl<W: Write> TextOverlay<W> {
    pub fn new(writer: W, show_finger_states: bool) -> Self {
        Self {
            writer,
            show_finger_states,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for TextOverlay<W> {
    fn write_report(&mut self, report: &FrameReport) -> Result<()> {
        writeln!(self.writer, "--- frame {} ---", report.frame)?;
        for line in overlay_lines(report, self.show_finger_states) {
            writeln!(self.writer, "{line}")?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes each report as one JSON object per line
pub struct JsonReport<W: Write> {
    writer: W,
}

impl<W: Write> JsonReport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for JsonReport<W> {
    fn write_report(&mut self, report: &FrameReport) -> Result<()> {
        serde_json::to_writer(&mut self.writer, report)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
