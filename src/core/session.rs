// File: src/core/session.rs
//! The word-suggestion session: owns the buffer, the caret, the overlay and
//! the original-form registry, and turns input events into transliteration
//! requests and their continuations.
//!
//! The session never calls the backend itself. Flows that need a
//! transliteration return a [`TransliterationRequest`]; whoever runs the
//! call hands the result back through [`WordSuggestionSession::complete`].
//! Each request remembers the span and text it was issued for, and a
//! completion that no longer matches the buffer is dropped. A commit's
//! held-back delimiter is the user's keystroke, not part of the result, so
//! it lands even when the result is dropped.

use std::collections::HashMap;

use crate::config::Config;
use crate::core::boundary::{char_len, replace_chars, slice_chars, word_before, word_boundary};
use crate::core::overlay::{
    build_display_list, layout_overlay, Overlay, OverlayLayout, OverlayStyle, TextMeasure,
    DEFAULT_MAX_CANDIDATES,
};
use crate::core::registry::OriginalFormRegistry;
use crate::core::script::ScriptRange;
use crate::core::types::{RequestToken, Span, TransliterationRequest};
use crate::error::Result;

#[derive(Debug, Clone)]
enum PendingKind {
    /// `anchor` is where the held-back delimiter goes. It starts at the end
    /// of the word and follows edits made while the request is in flight.
    Commit { delimiter: char, anchor: usize },
    Overlay { query: String },
}

#[derive(Debug, Clone)]
struct PendingRequest {
    span: Span,
    /// Buffer text inside `span` when the request was issued.
    snapshot: String,
    kind: PendingKind,
}

/// What a word-delimiting key did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelimiterOutcome {
    /// No word before the caret; the delimiter went straight into the buffer.
    Inserted,
    /// The delimiter is held back until this request completes.
    Requested(TransliterationRequest),
}

/// What a completion did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The word was replaced by the top suggestion and the delimiter.
    Committed { replacement: String },
    /// The call failed; the typed word was kept and the delimiter added.
    FellBack,
    /// The overlay now lists suggestions.
    OverlayShown,
    /// The overlay call failed and the overlay was hidden.
    OverlayHidden,
    /// The buffer changed under the request's span and the result was
    /// dropped. A held-back delimiter was still inserted.
    Stale,
    /// The token is not pending (superseded, dismissed, or never issued).
    Superseded,
}

#[derive(Debug)]
pub struct WordSuggestionSession {
    buffer: String,
    cursor: usize,
    registry: OriginalFormRegistry,
    overlay: Overlay,
    pending: HashMap<RequestToken, PendingRequest>,
    next_token: u64,
    script: ScriptRange,
    max_candidates: usize,
}

impl Default for WordSuggestionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WordSuggestionSession {
    pub fn new() -> Self {
        Self::with_options(ScriptRange::devanagari(), DEFAULT_MAX_CANDIDATES)
    }

    pub fn with_options(script: ScriptRange, max_candidates: usize) -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            registry: OriginalFormRegistry::new(),
            overlay: Overlay::Hidden,
            pending: HashMap::new(),
            next_token: 0,
            script,
            max_candidates,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_options(config.script.clone(), config.overlay.max_candidates)
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Caret position as a character offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn registry(&self) -> &OriginalFormRegistry {
        &self.registry
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn script(&self) -> &ScriptRange {
        &self.script
    }

    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// Span of the word at the caret.
    pub fn current_word(&self) -> Span {
        word_boundary(&self.buffer, self.cursor)
    }

    // --- Edit and caret reporting from the rendering surface ---

    /// Replaces the whole buffer, e.g. when the surface reloads its text.
    pub fn set_buffer(&mut self, text: impl Into<String>, cursor: usize) {
        self.buffer = text.into();
        self.cursor = cursor.min(char_len(&self.buffer));
        let len = char_len(&self.buffer);
        for pending in self.pending.values_mut() {
            if let PendingKind::Commit { anchor, .. } = &mut pending.kind {
                *anchor = (*anchor).min(len);
            }
        }
        self.hide_overlay();
    }

    pub fn insert_text(&mut self, text: &str) {
        self.edit(Span::empty(self.cursor), text);
        self.cursor += char_len(text);
        self.hide_overlay();
    }

    pub fn insert_char(&mut self, c: char) {
        let mut tmp = [0u8; 4];
        self.insert_text(c.encode_utf8(&mut tmp));
    }

    pub fn delete_backward(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.edit(Span::new(self.cursor - 1, self.cursor), "");
        self.cursor -= 1;
        self.hide_overlay();
    }

    /// Moves the caret. Any caret move is a new interaction and hides the
    /// overlay.
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(char_len(&self.buffer));
        self.hide_overlay();
    }

    // --- Flows ---

    /// A word-delimiting key (space) was pressed.
    ///
    /// With no word right before the caret the delimiter is inserted as
    /// usual. Otherwise insertion is held back and a request for the word is
    /// returned; the delimiter lands when the request completes.
    pub fn commit_on_delimiter(&mut self, delimiter: char) -> DelimiterOutcome {
        let span = word_before(&self.buffer, self.cursor);
        if span.is_empty() {
            self.insert_char(delimiter);
            return DelimiterOutcome::Inserted;
        }
        self.hide_overlay();

        let word = slice_chars(&self.buffer, span).to_owned();
        let token = self.issue(PendingRequest {
            span,
            snapshot: word.clone(),
            kind: PendingKind::Commit {
                delimiter,
                anchor: span.end,
            },
        });
        tracing::debug!(%token, %span, %word, "commit requested");
        DelimiterOutcome::Requested(TransliterationRequest { token, word })
    }

    /// The pointer was released inside the text at `offset`.
    ///
    /// Moves the caret there and, if a word is under it, opens a pending
    /// overlay and returns the request for its suggestions. Already
    /// transliterated words are looked up by the form originally typed.
    pub fn pointer_release(&mut self, offset: usize) -> Option<TransliterationRequest> {
        self.cursor = offset.min(char_len(&self.buffer));
        self.hide_overlay();

        let span = word_boundary(&self.buffer, self.cursor);
        if span.is_empty() {
            return None;
        }

        let text = slice_chars(&self.buffer, span).to_owned();
        let query = self.resolve_query(&text);
        let token = self.issue(PendingRequest {
            span,
            snapshot: text,
            kind: PendingKind::Overlay {
                query: query.clone(),
            },
        });
        self.overlay = Overlay::Pending { token, span };
        tracing::debug!(%token, %span, %query, "suggestions requested");
        Some(TransliterationRequest { token, word: query })
    }

    /// Word to ask the backend about for the token `text`.
    pub fn resolve_query(&self, text: &str) -> String {
        if self.script.is_entirely(text) {
            if let Some(original) = self.registry.original_of(text) {
                return original.to_owned();
            }
        }
        text.to_owned()
    }

    /// Feeds back the result of a transliteration call.
    pub fn complete(&mut self, token: RequestToken, result: Result<Vec<String>>) -> Completion {
        let Some(pending) = self.pending.remove(&token) else {
            tracing::debug!(%token, "completion for request no longer pending");
            return Completion::Superseded;
        };

        if !self.span_holds(pending.span, &pending.snapshot) {
            tracing::debug!(
                %token,
                span = %pending.span,
                expected = %pending.snapshot,
                "buffer changed under request, dropping result"
            );
            if self.overlay.pending_token() == Some(token) {
                self.overlay = Overlay::Hidden;
            }
            if let PendingKind::Commit { delimiter, anchor } = pending.kind {
                self.land_delimiter(anchor, delimiter);
            }
            return Completion::Stale;
        }

        match pending.kind {
            PendingKind::Commit { delimiter, .. } => {
                self.finish_commit(pending.span, pending.snapshot, delimiter, result)
            }
            PendingKind::Overlay { query } => self.finish_overlay(pending.span, query, result),
        }
    }

    /// Picks entry `index` of the shown overlay. Returns false when no overlay
    /// is shown or the index is out of range.
    pub fn select_suggestion(&mut self, index: usize) -> bool {
        let Overlay::Shown { span, entries, .. } = &self.overlay else {
            return false;
        };
        let Some(entry) = entries.get(index) else {
            return false;
        };
        let (span, choice) = (*span, entry.text.clone());
        self.apply_selection(&choice, span);
        true
    }

    /// Replaces `span` with `choice`, carrying the registry entry of the
    /// replaced word over to `choice` when it is a target-script word.
    pub fn apply_selection(&mut self, choice: &str, span: Span) {
        if span.end > char_len(&self.buffer) {
            tracing::warn!(%span, %choice, "selection span outside buffer");
            self.hide_overlay();
            return;
        }
        let replaced = slice_chars(&self.buffer, span).to_owned();
        if self.script.is_entirely(choice) && self.registry.propagate(&replaced, choice) {
            tracing::debug!(from = %replaced, to = %choice, "registry entry carried over");
        }
        self.replace_span(span, choice);
    }

    /// Pointer action outside both the overlay and the text.
    pub fn dismiss(&mut self) {
        self.hide_overlay();
    }

    /// Overlay placement for the current shown overlay.
    pub fn overlay_layout(
        &self,
        measure: &dyn TextMeasure,
        style: &OverlayStyle,
    ) -> Option<OverlayLayout> {
        match &self.overlay {
            Overlay::Shown { span, entries, .. } => {
                Some(layout_overlay(measure, &self.buffer, *span, entries, style))
            }
            _ => None,
        }
    }

    /// Ends the session: buffer, caret, overlay, pending requests and the
    /// registry are all cleared.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.overlay = Overlay::Hidden;
        self.pending.clear();
        self.registry.clear();
    }

    fn finish_commit(
        &mut self,
        span: Span,
        word: String,
        delimiter: char,
        result: Result<Vec<String>>,
    ) -> Completion {
        match result {
            Ok(suggestions) => {
                let top = suggestions.into_iter().next().unwrap_or_else(|| word.clone());
                tracing::debug!(%word, %top, "committing top suggestion");
                self.registry.record(top.clone(), word);
                let replacement = format!("{top}{delimiter}");
                self.replace_span(span, &replacement);
                Completion::Committed { replacement }
            }
            Err(err) => {
                tracing::warn!(error = %err, %word, "transliteration failed, keeping typed word");
                self.replace_span(span, &format!("{word}{delimiter}"));
                Completion::FellBack
            }
        }
    }

    fn finish_overlay(
        &mut self,
        span: Span,
        query: String,
        result: Result<Vec<String>>,
    ) -> Completion {
        match result {
            Ok(suggestions) => {
                let entries = build_display_list(&suggestions, &query, self.max_candidates);
                tracing::debug!(%query, shown = entries.len(), "overlay shown");
                self.overlay = Overlay::Shown {
                    span,
                    entries,
                    original: query,
                };
                Completion::OverlayShown
            }
            Err(err) => {
                tracing::warn!(error = %err, %query, "suggestion request failed");
                self.overlay = Overlay::Hidden;
                Completion::OverlayHidden
            }
        }
    }

    fn issue(&mut self, request: PendingRequest) -> RequestToken {
        self.next_token += 1;
        let token = RequestToken::new(self.next_token);
        self.pending.insert(token, request);
        token
    }

    /// The span still covers exactly the word it was issued for.
    fn span_holds(&self, span: Span, expected: &str) -> bool {
        span.end <= char_len(&self.buffer)
            && slice_chars(&self.buffer, span) == expected
            && word_boundary(&self.buffer, span.start) == span
    }

    /// Pure substitution of `span`; caret goes right after the new text.
    /// Offsets of any shown overlay are invalid afterwards, so it is hidden.
    fn replace_span(&mut self, span: Span, replacement: &str) {
        self.edit(span, replacement);
        self.cursor = span.start + char_len(replacement);
        self.hide_overlay();
    }

    /// Inserts a delimiter whose word was dropped as stale. The caret keeps
    /// its place relative to the text typed after the delimiter.
    fn land_delimiter(&mut self, anchor: usize, delimiter: char) {
        let at = anchor.min(char_len(&self.buffer));
        let cursor = self.cursor;
        let mut tmp = [0u8; 4];
        self.edit(Span::empty(at), delimiter.encode_utf8(&mut tmp));
        if cursor >= at {
            self.cursor = cursor + 1;
        }
        if self.overlay.anchor().is_some_and(|span| at < span.end) {
            self.hide_overlay();
        }
        tracing::debug!(at, "held-back delimiter inserted");
    }

    /// Every buffer mutation goes through here so that pending commit
    /// anchors stay on the same text.
    fn edit(&mut self, span: Span, text: &str) {
        replace_chars(&mut self.buffer, span, text);
        let inserted = char_len(text);
        for pending in self.pending.values_mut() {
            if let PendingKind::Commit { anchor, .. } = &mut pending.kind {
                *anchor = shift_anchor(*anchor, span, inserted);
            }
        }
    }

    fn hide_overlay(&mut self) {
        if let Some(token) = self.overlay.hide() {
            self.pending.remove(&token);
        }
    }
}

/// New position of `anchor` after `edited` was replaced by `inserted` chars.
/// Text typed right at the anchor stays after it: the delimiter came first.
fn shift_anchor(anchor: usize, edited: Span, inserted: usize) -> usize {
    if anchor < edited.start || (edited.is_empty() && anchor == edited.start) {
        anchor
    } else if anchor >= edited.end {
        anchor - edited.len() + inserted
    } else {
        edited.start + inserted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::overlay::EntryStyle;
    use crate::core::types::Rect;
    use crate::error::Error;

    fn ok(items: &[&str]) -> Result<Vec<String>> {
        Ok(items.iter().map(|s| s.to_string()).collect())
    }

    fn session_with(text: &str) -> WordSuggestionSession {
        let mut session = WordSuggestionSession::new();
        session.set_buffer(text, usize::MAX);
        session
    }

    fn requested(outcome: DelimiterOutcome) -> TransliterationRequest {
        match outcome {
            DelimiterOutcome::Requested(request) => request,
            DelimiterOutcome::Inserted => panic!("expected a request"),
        }
    }

    #[test]
    fn space_after_word_commits_top_suggestion() {
        let mut session = session_with("main namaste");
        let request = requested(session.commit_on_delimiter(' '));
        assert_eq!(request.word, "namaste");
        assert_eq!(session.buffer(), "main namaste");

        let done = session.complete(request.token, ok(&["नमस्ते", "नमस्तें"]));
        assert_eq!(
            done,
            Completion::Committed {
                replacement: "नमस्ते ".into()
            }
        );
        assert_eq!(session.buffer(), "main नमस्ते ");
        assert_eq!(session.cursor(), 12);
        assert_eq!(session.registry().original_of("नमस्ते"), Some("namaste"));
        assert_eq!(session.pending_requests(), 0);
    }

    #[test]
    fn space_after_whitespace_just_inserts() {
        let mut session = session_with("main ");
        assert_eq!(session.commit_on_delimiter(' '), DelimiterOutcome::Inserted);
        assert_eq!(session.buffer(), "main  ");
        assert_eq!(session.cursor(), 6);
        assert_eq!(session.pending_requests(), 0);
    }

    #[test]
    fn failed_commit_keeps_typed_word() {
        let mut session = session_with("hello namaste");
        let request = requested(session.commit_on_delimiter(' '));
        let done = session.complete(request.token, Err(Error::backend("connection refused")));
        assert_eq!(done, Completion::FellBack);
        assert_eq!(session.buffer(), "hello namaste ");
        assert_eq!(session.cursor(), 14);
        assert!(session.registry().is_empty());
        assert!(!session.overlay().is_visible());
    }

    #[test]
    fn empty_suggestion_list_commits_original() {
        let mut session = session_with("xyz");
        let request = requested(session.commit_on_delimiter(' '));
        session.complete(request.token, ok(&[]));
        assert_eq!(session.buffer(), "xyz ");
        assert_eq!(session.registry().original_of("xyz"), Some("xyz"));
    }

    #[test]
    fn commit_mid_word_replaces_whole_word() {
        let mut session = session_with("namaste dost");
        session.set_cursor(3);
        let request = requested(session.commit_on_delimiter(' '));
        assert_eq!(request.word, "namaste");
        session.complete(request.token, ok(&["नमस्ते"]));
        assert_eq!(session.buffer(), "नमस्ते  dost");
        assert_eq!(session.cursor(), 7);
    }

    #[test]
    fn click_on_transliterated_word_queries_original() {
        let mut session = session_with("main namaste");
        let commit = requested(session.commit_on_delimiter(' '));
        session.complete(commit.token, ok(&["नमस्ते"]));
        session.set_buffer("main नमस्ते", 0);

        let request = session.pointer_release(7).expect("word under pointer");
        assert_eq!(request.word, "namaste");
        assert_eq!(session.overlay().pending_token(), Some(request.token));

        let done = session.complete(request.token, ok(&["नमस्ते", "नमस्तें", "नमस्तेा"]));
        assert_eq!(done, Completion::OverlayShown);
        let texts: Vec<_> = session.overlay().entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["नमस्ते", "नमस्तें", "नमस्तेा", "namaste"]);
        assert_eq!(
            session.overlay().entries().last().map(|e| e.style),
            Some(EntryStyle::Original)
        );
    }

    #[test]
    fn click_on_unregistered_word_queries_literal_text() {
        let mut session = session_with("hello नमस्ते");
        let request = session.pointer_release(8).unwrap();
        assert_eq!(request.word, "नमस्ते");
    }

    #[test]
    fn click_on_whitespace_hides_overlay() {
        let mut session = session_with("a  b");
        let request = session.pointer_release(0).unwrap();
        session.complete(request.token, ok(&["अ"]));
        assert!(session.overlay().is_visible());

        assert!(session.pointer_release(2).is_none());
        assert_eq!(*session.overlay(), Overlay::Hidden);
        assert_eq!(session.cursor(), 2);
    }

    #[test]
    fn failed_overlay_request_hides_overlay() {
        let mut session = session_with("namaste");
        let request = session.pointer_release(2).unwrap();
        let done = session.complete(request.token, Err(Error::malformed("expected value")));
        assert_eq!(done, Completion::OverlayHidden);
        assert_eq!(*session.overlay(), Overlay::Hidden);
        assert_eq!(session.buffer(), "namaste");
    }

    #[test]
    fn selection_propagates_registry_entry() {
        let mut session = session_with("a");
        let commit = requested(session.commit_on_delimiter(' '));
        session.complete(commit.token, ok(&["अ"]));
        assert_eq!(session.buffer(), "अ ");

        let request = session.pointer_release(0).unwrap();
        assert_eq!(request.word, "a");
        session.complete(request.token, ok(&["अ", "आ"]));
        assert!(session.select_suggestion(1));

        assert_eq!(session.buffer(), "आ ");
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.registry().original_of("आ"), Some("a"));
        assert!(!session.overlay().is_visible());
    }

    #[test]
    fn selecting_original_does_not_register_it() {
        let mut session = session_with("नमस्ते");
        let request = session.pointer_release(1).unwrap();
        session.complete(request.token, ok(&["नमस्ते"]));
        // entries: नमस्ते (original only, since it equals the query)
        assert_eq!(session.overlay().entries().len(), 1);
        assert!(session.select_suggestion(0));
        assert!(session.registry().is_empty());
    }

    #[test]
    fn selection_is_pure_substitution() {
        let mut session = session_with("one two three");
        session.apply_selection("दो", Span::new(4, 7));
        let first = session.buffer().to_owned();
        let span = word_boundary(session.buffer(), 4);
        session.apply_selection("दो", span);
        assert_eq!(session.buffer(), first);
        assert_eq!(first, "one दो three");
        assert_eq!(session.cursor(), 6);
    }

    #[test]
    fn select_without_overlay_does_nothing() {
        let mut session = session_with("abc");
        assert!(!session.select_suggestion(0));
        assert_eq!(session.buffer(), "abc");
    }

    #[test]
    fn edit_after_commit_request_makes_it_stale() {
        let mut session = session_with("namaste");
        let request = requested(session.commit_on_delimiter(' '));
        session.set_cursor(0);
        session.insert_text("ok ");
        let done = session.complete(request.token, ok(&["नमस्ते"]));
        assert_eq!(done, Completion::Stale);
        assert_eq!(session.buffer(), "ok namaste ");
        assert_eq!(session.cursor(), 3);
        assert!(session.registry().is_empty());
    }

    #[test]
    fn growing_the_word_makes_commit_stale() {
        let mut session = session_with("namaste");
        let request = requested(session.commit_on_delimiter(' '));
        session.insert_text("x");
        assert_eq!(session.complete(request.token, ok(&["नमस्ते"])), Completion::Stale);
        assert_eq!(session.buffer(), "namaste x");
        assert_eq!(session.cursor(), 9);

        let mut session = session_with("namaste");
        let request = requested(session.commit_on_delimiter(' '));
        session.set_buffer("namaste, bye", 12);
        let done = session.complete(request.token, ok(&["नमस्ते"]));
        assert_eq!(done, Completion::Stale);
    }

    #[test]
    fn typing_ahead_of_a_slow_commit_keeps_the_space() {
        let mut session = WordSuggestionSession::new();
        session.insert_text("main");
        let request = requested(session.commit_on_delimiter(' '));
        session.insert_text("n");
        assert_eq!(session.buffer(), "mainn");

        let done = session.complete(request.token, ok(&["मैं"]));
        assert_eq!(done, Completion::Stale);
        assert_eq!(session.buffer(), "main n");
        assert_eq!(session.cursor(), 6);
        assert!(session.registry().is_empty());
    }

    #[test]
    fn two_quick_spaces_both_land() {
        let mut session = WordSuggestionSession::new();
        session.insert_text("a");
        let first = requested(session.commit_on_delimiter(' '));
        session.insert_text("b");
        let second = requested(session.commit_on_delimiter(' '));
        assert_eq!(second.word, "ab");

        assert_eq!(session.complete(first.token, ok(&["अ"])), Completion::Stale);
        assert_eq!(session.buffer(), "a b");
        assert_eq!(session.complete(second.token, ok(&["अब"])), Completion::Stale);
        assert_eq!(session.buffer(), "a b ");
        assert_eq!(session.cursor(), 4);
    }

    #[test]
    fn anchor_shifts_with_edits() {
        let word = Span::new(2, 5);
        // insertion before, at, and after the anchor
        assert_eq!(shift_anchor(7, Span::empty(0), 3), 10);
        assert_eq!(shift_anchor(7, Span::empty(7), 3), 7);
        assert_eq!(shift_anchor(7, Span::empty(9), 3), 7);
        // replacing a range that ends at the anchor keeps it at the new end
        assert_eq!(shift_anchor(5, word, 1), 3);
        // deleting across the anchor pulls it to the start of the cut
        assert_eq!(shift_anchor(4, word, 0), 2);
    }

    #[test]
    fn typing_elsewhere_keeps_commit_valid() {
        let mut session = session_with("namaste");
        let request = requested(session.commit_on_delimiter(' '));
        session.set_buffer("namaste bye", 11);
        let done = session.complete(request.token, ok(&["नमस्ते"]));
        assert_eq!(
            done,
            Completion::Committed {
                replacement: "नमस्ते ".into()
            }
        );
        assert_eq!(session.buffer(), "नमस्ते  bye");
    }

    #[test]
    fn newer_click_supersedes_older_one() {
        let mut session = session_with("one two");
        let first = session.pointer_release(1).unwrap();
        let second = session.pointer_release(5).unwrap();
        assert_eq!(session.complete(first.token, ok(&["वन"])), Completion::Superseded);
        assert_eq!(session.complete(second.token, ok(&["टू"])), Completion::OverlayShown);
        assert_eq!(session.overlay().anchor(), Some(Span::new(4, 7)));
    }

    #[test]
    fn dismiss_hides_without_mutation() {
        let mut session = session_with("word");
        let request = session.pointer_release(2).unwrap();
        session.complete(request.token, ok(&["वर्ड"]));
        session.dismiss();
        assert_eq!(*session.overlay(), Overlay::Hidden);
        assert_eq!(session.buffer(), "word");
        assert!(session.registry().is_empty());
    }

    #[test]
    fn dismissing_pending_overlay_drops_its_request() {
        let mut session = session_with("word");
        let request = session.pointer_release(2).unwrap();
        session.dismiss();
        assert_eq!(session.pending_requests(), 0);
        assert_eq!(session.complete(request.token, ok(&["वर्ड"])), Completion::Superseded);
        assert_eq!(*session.overlay(), Overlay::Hidden);
    }

    #[test]
    fn layout_only_when_shown() {
        struct Cells;
        impl TextMeasure for Cells {
            fn span_rect(&self, _buffer: &str, span: Span) -> Rect {
                Rect::new(span.start as f32, 0.0, span.len() as f32, 1.0)
            }
            fn text_width(&self, text: &str) -> f32 {
                char_len(text) as f32
            }
        }

        let style = OverlayStyle {
            padding: 2.0,
            gap: 0.0,
            row_height: 1.0,
        };
        let mut session = session_with("hi there");
        let request = session.pointer_release(4).unwrap();
        assert!(session.overlay_layout(&Cells, &style).is_none());
        session.complete(request.token, ok(&["देयर"]));
        let layout = session.overlay_layout(&Cells, &style).unwrap();
        assert_eq!((layout.x, layout.y, layout.rows), (3.0, 1.0, 2));
        assert_eq!(layout.width, 5.0 + 2.0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = session_with("namaste");
        let request = requested(session.commit_on_delimiter(' '));
        session.complete(request.token, ok(&["नमस्ते"]));
        session.pointer_release(0);
        session.reset();
        assert_eq!(session.buffer(), "");
        assert_eq!(session.cursor(), 0);
        assert!(session.registry().is_empty());
        assert_eq!(session.pending_requests(), 0);
        assert_eq!(*session.overlay(), Overlay::Hidden);
    }

    #[test]
    fn edits_track_the_caret() {
        let mut session = WordSuggestionSession::new();
        session.insert_text("नमस");
        session.insert_char('्');
        assert_eq!(session.cursor(), 4);
        session.delete_backward();
        assert_eq!(session.buffer(), "नमस");
        session.set_cursor(0);
        session.delete_backward();
        assert_eq!(session.buffer(), "नमस");
        assert_eq!(session.current_word(), Span::new(0, 3));
    }
}
