// File: src/core/overlay.rs
//! The suggestion overlay: which entries it lists, whether it is showing,
//! and where it goes on the rendering surface.

use serde::{Deserialize, Serialize};

use crate::core::boundary::slice_chars;
use crate::core::types::{Rect, RequestToken, Span};

/// How many ranked candidates the overlay lists before the original word.
pub const DEFAULT_MAX_CANDIDATES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStyle {
    /// A transliteration candidate from the backend.
    Candidate,
    /// The literal original word, always the last entry and styled apart.
    Original,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayEntry {
    pub text: String,
    pub style: EntryStyle,
}

impl OverlayEntry {
    pub fn candidate(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: EntryStyle::Candidate,
        }
    }

    pub fn original(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: EntryStyle::Original,
        }
    }
}

/// Builds the list the overlay shows for one suggestion response.
///
/// Takes up to `max_candidates` suggestions, drops any equal to `original`,
/// then appends `original` itself. The result holds at most
/// `max_candidates + 1` entries and `original` exactly once, last.
pub fn build_display_list(
    suggestions: &[String],
    original: &str,
    max_candidates: usize,
) -> Vec<OverlayEntry> {
    let mut entries: Vec<OverlayEntry> = suggestions
        .iter()
        .take(max_candidates)
        .filter(|s| s.as_str() != original)
        .map(|s| OverlayEntry::candidate(s.as_str()))
        .collect();
    entries.push(OverlayEntry::original(original));
    entries
}

/// Overlay lifecycle. It only exists while a request is pending or its
/// result is on screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Overlay {
    #[default]
    Hidden,
    Pending {
        token: RequestToken,
        span: Span,
    },
    Shown {
        span: Span,
        entries: Vec<OverlayEntry>,
        /// The resolved original word the list was built for.
        original: String,
    },
}

impl Overlay {
    pub fn is_visible(&self) -> bool {
        matches!(self, Overlay::Shown { .. })
    }

    /// The word span the overlay belongs to.
    pub fn anchor(&self) -> Option<Span> {
        match self {
            Overlay::Hidden => None,
            Overlay::Pending { span, .. } | Overlay::Shown { span, .. } => Some(*span),
        }
    }

    pub fn entries(&self) -> &[OverlayEntry] {
        match self {
            Overlay::Shown { entries, .. } => entries,
            _ => &[],
        }
    }

    pub fn pending_token(&self) -> Option<RequestToken> {
        match self {
            Overlay::Pending { token, .. } => Some(*token),
            _ => None,
        }
    }

    /// Hides the overlay, handing back the token of a request that was
    /// still pending for it.
    pub fn hide(&mut self) -> Option<RequestToken> {
        std::mem::take(self).pending_token()
    }
}

/// Measures text on the rendering surface.
///
/// Lets overlay placement run against real font metrics, a terminal grid,
/// or a fixed-width stand-in in tests.
pub trait TextMeasure {
    /// On-screen rectangle of `span` within `buffer` as currently laid out,
    /// after wrapping and scrolling.
    fn span_rect(&self, buffer: &str, span: Span) -> Rect;

    /// Rendered width of one overlay entry.
    fn text_width(&self, text: &str) -> f32;
}

/// Spacing for overlay placement, in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Added to the widest entry.
    pub padding: f32,
    /// Space between the bottom of the word and the top of the overlay.
    pub gap: f32,
    pub row_height: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            padding: 32.0,
            gap: 0.0,
            row_height: 24.0,
        }
    }
}

/// Where the overlay goes and how big it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayout {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub row_height: f32,
    pub rows: usize,
}

impl OverlayLayout {
    pub fn height(&self) -> f32 {
        self.row_height * self.rows as f32
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height())
    }

    /// Rectangle of entry `index`.
    pub fn row_rect(&self, index: usize) -> Rect {
        Rect::new(
            self.x,
            self.y + self.row_height * index as f32,
            self.width,
            self.row_height,
        )
    }

    /// Index of the entry under a point, if any.
    pub fn row_at(&self, x: f32, y: f32) -> Option<usize> {
        if !self.bounds().contains(x, y) || self.row_height <= 0.0 {
            return None;
        }
        let row = ((y - self.y) / self.row_height) as usize;
        (row < self.rows).then_some(row)
    }
}

/// Positions the overlay just below the anchor word, as wide as its widest
/// entry plus padding.
pub fn layout_overlay(
    measure: &dyn TextMeasure,
    buffer: &str,
    span: Span,
    entries: &[OverlayEntry],
    style: &OverlayStyle,
) -> OverlayLayout {
    let anchor = measure.span_rect(buffer, span);
    let widest = entries
        .iter()
        .map(|entry| measure.text_width(&entry.text))
        .fold(0.0_f32, f32::max);
    tracing::trace!(
        span = %span,
        word = slice_chars(buffer, span),
        x = anchor.x,
        y = anchor.bottom(),
        widest,
        "overlay layout"
    );
    OverlayLayout {
        x: anchor.x,
        y: anchor.bottom() + style.gap,
        width: widest + style.padding,
        row_height: style.row_height,
        rows: entries.len(),
    }
}
