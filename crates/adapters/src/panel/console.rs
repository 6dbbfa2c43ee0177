// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console panel: draws frames as text boxes
//!
//! Stands in for the e-paper panel on development machines. Frames can also
//! be mirrored into a snapshot directory, one file per full redraw.

use super::{PanelAdapter, PanelError};
use async_trait::async_trait;
use spoke_core::{Frame, Icon};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

const WIDTH: usize = 32;

/// Panel writing text renderings to a byte sink
#[derive(Clone)]
pub struct ConsolePanel {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
    snapshot_dir: Option<PathBuf>,
    snapshots: Arc<AtomicU64>,
}

impl ConsolePanel {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
            snapshot_dir: None,
            snapshots: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Also save every full redraw under `dir`
    pub fn with_snapshots(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(dir.into());
        self
    }

    fn write(&self, text: &str) -> Result<(), PanelError> {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn save_snapshot(&self, frame: &Frame, text: &str) -> Result<(), PanelError> {
        let Some(dir) = &self.snapshot_dir else {
            return Ok(());
        };
        let n = self.snapshots.fetch_add(1, Ordering::Relaxed);
        let path = dir.join(format!("{:04}-{}.txt", n, frame.view.name()));
        std::fs::write(&path, text)?;
        tracing::debug!(path = %path.display(), "saved view snapshot");
        Ok(())
    }
}

#[async_trait]
impl PanelAdapter for ConsolePanel {
    async fn init(&self) -> Result<(), PanelError> {
        if let Some(dir) = &self.snapshot_dir {
            std::fs::create_dir_all(dir).map_err(|e| {
                PanelError::Init(format!("snapshot dir {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    async fn draw(&self, frame: &Frame) -> Result<(), PanelError> {
        let text = render_text(frame);
        self.save_snapshot(frame, &text)?;
        self.write(&text)
    }

    async fn refresh(&self, frame: &Frame) -> Result<(), PanelError> {
        // Only the first line changes on a partial refresh
        let line = frame.lines.first().map(String::as_str).unwrap_or_default();
        self.write(&format!("  ~ {}\n", line))
    }

    async fn clear(&self) -> Result<(), PanelError> {
        self.write(&render_text(&Frame {
            view: spoke_core::ViewKind::Blank,
            icon: None,
            heading: None,
            lines: Vec::new(),
            footer: None,
            rotate: false,
        }))
    }
}

fn icon_glyph(icon: Icon) -> &'static str {
    match icon {
        Icon::Tick => "[v]",
        Icon::Cross => "[x]",
        Icon::Warning => "[!]",
        Icon::Rfid => "[))]",
        Icon::Barcode => "[||]",
    }
}

fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= WIDTH {
        return text.chars().take(WIDTH).collect();
    }
    let left = (WIDTH - len) / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(WIDTH - len - left))
}

/// Text rendering of a frame inside a box.
///
/// Rotated frames are turned upside down: rows reversed, each row mirrored.
pub fn render_text(frame: &Frame) -> String {
    let mut rows: Vec<String> = Vec::new();

    if let Some(heading) = &frame.heading {
        rows.push(center(heading));
    }
    match frame.icon {
        Some(icon) => {
            let glyph = icon_glyph(icon);
            for (i, line) in frame.lines.iter().enumerate() {
                let prefix = if i == 0 { glyph } else { "" };
                rows.push(center(&format!("{:<5}{}", prefix, line)));
            }
            if frame.lines.is_empty() {
                rows.push(center(glyph));
            }
        }
        None => rows.extend(frame.lines.iter().map(|line| center(line))),
    }
    if let Some(footer) = &frame.footer {
        rows.push(center(footer));
    }

    if frame.rotate {
        rows.reverse();
        for row in rows.iter_mut() {
            *row = row.chars().rev().collect();
        }
    }

    let border = format!("+{}+\n", "-".repeat(WIDTH));
    let mut text = border.clone();
    for row in rows {
        text.push('|');
        text.push_str(&row);
        text.push_str("|\n");
    }
    text.push_str(&border);
    text
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod tests;
