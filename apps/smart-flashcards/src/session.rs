//! Study session state and transitions.
//!
//! Everything here is pure: no storage, no terminal. The app layer calls
//! these methods and persists [`Session::snapshot`] afterwards.

use crate::models::{Flashcard, Snapshot};
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

/// Study session.
#[derive(Debug, Clone)]
pub struct Session {
    cards: Vec<Flashcard>,
    index: usize,
    revealed: bool,
    known: Vec<usize>,
    in_progress: Vec<usize>,
    started_at: Option<DateTime<Utc>>,
    elapsed: Duration,
    reset_reveal_on_navigate: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            cards: Vec::new(),
            index: 0,
            revealed: false,
            known: Vec::new(),
            in_progress: Vec::new(),
            started_at: None,
            elapsed: Duration::zero(),
            reset_reveal_on_navigate: true,
        }
    }
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether moving to another card hides its answer again.
    pub fn with_reset_reveal_on_navigate(mut self, reset: bool) -> Self {
        self.reset_reveal_on_navigate = reset;
        self
    }

    /// Restore a persisted snapshot.
    ///
    /// Repeated marks and marks past the end of the sequence are dropped.
    /// The clock is not part of the snapshot; a restored session with cards
    /// starts a fresh clock at `now`.
    pub fn restore(&mut self, snapshot: Snapshot, now: DateTime<Utc>) {
        self.cards = snapshot.cards;
        self.known = valid_marks(snapshot.known, self.cards.len());
        self.in_progress = valid_marks(snapshot.in_progress, self.cards.len());
        self.index = 0;
        self.revealed = false;
        self.elapsed = Duration::zero();
        self.started_at = if self.cards.is_empty() { None } else { Some(now) };
    }

    /// Current persistable state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cards: self.cards.clone(),
            known: self.known.clone(),
            in_progress: self.in_progress.clone(),
        }
    }

    /// Replace the session with a freshly generated set.
    pub fn generate(&mut self, cards: Vec<Flashcard>, now: DateTime<Utc>) {
        self.cards = cards;
        self.index = 0;
        self.revealed = false;
        self.known.clear();
        self.in_progress.clear();
        self.started_at = Some(now);
        self.elapsed = Duration::zero();
    }

    /// Drop the working set. Ends the session and stops the clock.
    pub fn clear(&mut self) {
        self.cards.clear();
        self.index = 0;
        self.revealed = false;
        self.known.clear();
        self.in_progress.clear();
        self.started_at = None;
        self.elapsed = Duration::zero();
    }

    /// Whether there are cards to study.
    pub fn is_active(&self) -> bool {
        !self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn known(&self) -> &[usize] {
        &self.known
    }

    pub fn in_progress(&self) -> &[usize] {
        &self.in_progress
    }

    /// Card at the current index.
    pub fn current_card(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    /// Text showing on the current card.
    pub fn visible_text(&self) -> Option<&str> {
        self.current_card().map(|card| {
            if self.revealed {
                card.back.as_str()
            } else {
                card.front.as_str()
            }
        })
    }

    /// Flip the current card.
    pub fn toggle_reveal(&mut self) {
        if self.is_active() {
            self.revealed = !self.revealed;
        }
    }

    /// Move to the next card, wrapping to the first.
    pub fn next_card(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.cards.len();
        self.after_move();
    }

    /// Move to the previous card, wrapping to the last.
    pub fn previous_card(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        let len = self.cards.len();
        self.index = (self.index + len - 1) % len;
        self.after_move();
    }

    fn after_move(&mut self) {
        if self.reset_reveal_on_navigate {
            self.revealed = false;
        }
    }

    /// Reorder the cards uniformly at random.
    ///
    /// Classification marks follow their cards to the new positions. The
    /// current index stays where it is.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let len = self.cards.len();
        if len < 2 {
            return;
        }

        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(rng);

        // new_pos[old] = new
        let mut new_pos = vec![0; len];
        for (new, &old) in order.iter().enumerate() {
            new_pos[old] = new;
        }

        let mut old_cards: Vec<Option<Flashcard>> =
            std::mem::take(&mut self.cards).into_iter().map(Some).collect();
        self.cards = order
            .iter()
            .filter_map(|&old| old_cards[old].take())
            .collect();

        let remap = |indices: &mut Vec<usize>| {
            let moved = indices.iter().filter_map(|&i| new_pos.get(i).copied()).collect();
            *indices = valid_marks(moved, len);
        };
        remap(&mut self.known);
        remap(&mut self.in_progress);
        self.after_move();
    }

    /// Mark the current card as known and advance.
    pub fn mark_known(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        if !self.known.contains(&self.index) {
            self.known.push(self.index);
        }
        self.next_card();
    }

    /// Mark the current card for review and advance.
    pub fn mark_in_progress(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        if !self.in_progress.contains(&self.index) {
            self.in_progress.push(self.index);
        }
        self.next_card();
    }

    /// Replace the working set with the cards marked for review.
    ///
    /// The rest of the sequence is gone afterwards. Both marks are cleared
    /// since their indices referred to the old sequence.
    pub fn review_difficult(&mut self) {
        let cards: Vec<Flashcard> = self
            .in_progress
            .iter()
            .filter_map(|&i| self.cards.get(i).cloned())
            .collect();
        self.cards = cards;
        self.index = 0;
        self.revealed = false;
        self.known.clear();
        self.in_progress.clear();
        if self.cards.is_empty() {
            self.started_at = None;
            self.elapsed = Duration::zero();
        }
    }

    /// Forget all classification marks, keeping the cards.
    pub fn reset_progress(&mut self) {
        self.known.clear();
        self.in_progress.clear();
    }

    pub fn is_known(&self, index: usize) -> bool {
        self.known.contains(&index)
    }

    pub fn is_in_progress(&self, index: usize) -> bool {
        self.in_progress.contains(&index)
    }

    /// Known cards as a whole percentage, rounded down.
    pub fn progress_percent(&self) -> u16 {
        let total = self.cards.len();
        if total == 0 {
            return 0;
        }
        ((self.known.len() * 100 / total).min(100)) as u16
    }

    /// Update elapsed study time. Does nothing while no clock is running.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if let Some(started) = self.started_at {
            self.elapsed = now.signed_duration_since(started).max(Duration::zero());
        }
    }

    pub fn is_timing(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed study time as HH:MM:SS.
    pub fn elapsed_display(&self) -> String {
        format_duration(self.elapsed)
    }
}

/// Keep the first occurrence of each in-range index, in order.
fn valid_marks(indices: Vec<usize>, len: usize) -> Vec<usize> {
    let mut seen = Vec::with_capacity(indices.len());
    for i in indices {
        if i < len && !seen.contains(&i) {
            seen.push(i);
        }
    }
    seen
}

/// Format a duration as HH:MM:SS. Hours are not capped at 24.
pub fn format_duration(dur: Duration) -> String {
    let hours = dur.num_hours();
    let mins = dur.num_minutes() % 60;
    let secs = dur.num_seconds() % 60;
    format!("{:02}:{:02}:{:02}", hours, mins, secs)
}
