// File: src/terminal.rs
//! Lays the buffer out on a terminal grid so the overlay can be placed in
//! cells, and maps clicks back to character offsets.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::boundary::slice_chars;
use crate::core::overlay::TextMeasure;
use crate::core::types::{Rect, Span};

/// A cell on the wrapped text grid, before scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

/// Grid position of the caret in front of every character, plus one entry
/// for the end of the buffer. Lines wrap at `width` columns; `'\n'` sits at
/// the end of its line.
pub fn caret_positions(buffer: &str, width: usize) -> Vec<CellPos> {
    let width = width.max(1);
    let mut positions = Vec::with_capacity(buffer.len() + 1);
    let (mut row, mut col) = (0, 0);
    for c in buffer.chars() {
        if c == '\n' {
            positions.push(CellPos { row, col });
            row += 1;
            col = 0;
            continue;
        }
        let w = c.width().unwrap_or(0);
        if col > 0 && col + w > width {
            row += 1;
            col = 0;
        }
        positions.push(CellPos { row, col });
        col += w;
    }
    if col >= width {
        row += 1;
        col = 0;
    }
    positions.push(CellPos { row, col });
    positions
}

/// The buffer cut into the rows it occupies on screen.
pub fn visual_rows(buffer: &str, width: usize) -> Vec<String> {
    let positions = caret_positions(buffer, width);
    let rows = positions.last().map_or(1, |p| p.row + 1);
    let mut out = vec![String::new(); rows];
    for (c, pos) in buffer.chars().zip(&positions) {
        if c != '\n' {
            out[pos.row].push(c);
        }
    }
    out
}

/// Text field geometry on the terminal, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerminalMeasure {
    pub origin_x: u16,
    pub origin_y: u16,
    /// Columns before wrapping.
    pub width: u16,
    /// Rows visible at once.
    pub height: u16,
    /// First visible row of the wrapped text.
    pub scroll: usize,
}

impl TerminalMeasure {
    pub fn caret_cell(&self, buffer: &str, offset: usize) -> CellPos {
        let positions = caret_positions(buffer, self.width as usize);
        positions[offset.min(positions.len() - 1)]
    }

    /// Adjusts `scroll` so the caret row is visible.
    pub fn follow_caret(&mut self, buffer: &str, cursor: usize) {
        let row = self.caret_cell(buffer, cursor).row;
        let height = (self.height as usize).max(1);
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll + height {
            self.scroll = row + 1 - height;
        }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.origin_x
            && column < self.origin_x + self.width
            && row >= self.origin_y
            && row < self.origin_y + self.height
    }

    /// Character offset for a click at screen cell (`column`, `row`).
    ///
    /// Clicking past the end of a line lands at the end of that line.
    pub fn offset_at(&self, buffer: &str, column: u16, row: u16) -> usize {
        let target_row = row.saturating_sub(self.origin_y) as usize + self.scroll;
        let target_col = column.saturating_sub(self.origin_x) as usize;
        let positions = caret_positions(buffer, self.width as usize);
        positions
            .iter()
            .enumerate()
            .filter(|(_, p)| p.row == target_row && p.col <= target_col)
            .map(|(i, _)| i)
            .last()
            .unwrap_or(positions.len() - 1)
    }
}

impl TextMeasure for TerminalMeasure {
    fn span_rect(&self, buffer: &str, span: Span) -> Rect {
        let start = self.caret_cell(buffer, span.start);
        Rect::new(
            self.origin_x as f32 + start.col as f32,
            self.origin_y as f32 + start.row as f32 - self.scroll as f32,
            self.text_width(slice_chars(buffer, span)),
            1.0,
        )
    }

    fn text_width(&self, text: &str) -> f32 {
        text.width() as f32
    }
}
