//! Headless canvas that records draw calls
//!
//! Lets the runner render without a window and lets tests assert on the
//! exact command stream.

use serde::Serialize;

use crate::chart::Canvas;
use crate::types::Viewport;

/// One recorded drawing primitive
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
        color: String,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: String,
        width: f64,
    },
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: String,
    },
    StrokeRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: String,
    },
    Triangle {
        points: [(f64, f64); 3],
        color: String,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        color: String,
        size_px: f64,
    },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FrameRecorder {
    commands: Vec<DrawCommand>,
}

impl FrameRecorder {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// Text labels in draw order
    pub fn texts(&self) -> Vec<String> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.commands)
    }
}

impl Canvas for FrameRecorder {
    fn clear(&mut self, viewport: Viewport, color: &str) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear {
            width: viewport.width,
            height: viewport.height,
            color: color.to_string(),
        });
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, width: f64) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color: color.to_string(),
            width,
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            w,
            h,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.commands.push(DrawCommand::StrokeRect {
            x,
            y,
            w,
            h,
            color: color.to_string(),
        });
    }

    fn fill_triangle(&mut self, points: [(f64, f64); 3], color: &str) {
        self.commands.push(DrawCommand::Triangle {
            points,
            color: color.to_string(),
        });
    }

    fn text(&mut self, text: &str, x: f64, y: f64, color: &str, size_px: f64) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            color: color.to_string(),
            size_px,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_starts_new_frame() {
        let mut rec = FrameRecorder::default();
        rec.text("old", 0.0, 0.0, "#fff", 12.0);
        rec.clear(Viewport::new(10.0, 10.0), "#000");
        assert_eq!(rec.commands().len(), 1);
        assert!(rec.texts().is_empty());
    }

    #[test]
    fn test_json_is_tagged() {
        let mut rec = FrameRecorder::default();
        rec.fill_triangle([(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)], "#16a34a");
        let json = rec.to_json().unwrap();
        assert!(json.contains("\"op\":\"triangle\""));
    }
}
