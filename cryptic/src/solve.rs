//! Writing letters, spotting solved entries, and finishing the puzzle.

use crate::grid::Colour;
use crate::session::{Event, Session};
use crate::Step;
use tracing::{debug, info};

impl Session {
  /// Writes `letter` at the cursor, then moves the cursor on. If the cursor is on a
  /// locked square the letter goes in the next unlocked one instead; if there is none,
  /// nothing happens. Anything but an ASCII letter is ignored.
  pub fn type_character(&mut self, letter: char) {
    if !letter.is_ascii_alphabetic() {
      return;
    }
    let Some(entry) = self.current else {
      return;
    };
    let before = self.active_pos();

    if self.grid.cell(self.entries[entry].active_cell()).is_locked() {
      match self.entries[entry].next_unlocked(&self.grid, Step::Forward) {
        Some(i) => self.entries[entry].active = i,
        None => return,
      }
    }

    self.apply_letter(self.entries[entry].active_cell(), letter);

    if let Some(i) = self.entries[entry].next_unlocked(&self.grid, Step::Forward) {
      self.entries[entry].active = i;
    }
    self.cursor_moved(before);
  }

  /// Clears the letter at the cursor, then moves the cursor back. A locked square under
  /// the cursor is skipped first, as for [type_character](Self::type_character).
  pub fn backspace(&mut self) {
    let Some(entry) = self.current else {
      return;
    };
    let before = self.active_pos();

    if self.grid.cell(self.entries[entry].active_cell()).is_locked() {
      match self.entries[entry].next_unlocked(&self.grid, Step::Backward) {
        Some(i) => self.entries[entry].active = i,
        None => return,
      }
    }

    let index = self.entries[entry].active_cell();
    let cell = self.grid.cell_mut(index);
    if cell.letter.take().is_some() {
      let pos = cell.pos();
      self.emit(Event::CellChanged(pos));
    }

    if let Some(i) = self.entries[entry].next_unlocked(&self.grid, Step::Backward) {
      self.entries[entry].active = i;
    }
    self.cursor_moved(before);
  }

  /// Checks the current entry against its answer, marking it solved if it matches.
  pub fn submit(&mut self) {
    let Some(entry) = self.current else {
      return;
    };
    let correct = self.entries[entry].is_correct(&self.grid);
    if correct {
      self.mark_solved(entry);
    }
    let id = self.entries[entry].id().to_string();
    debug!(entry = %id, correct, "submitted");
    self.emit(Event::Submission { entry: id, correct });
  }

  /// Fills the current entry with its answer and submits it. Locked squares are left
  /// alone; they already hold a solved letter.
  pub fn reveal_entry(&mut self) {
    let Some(entry) = self.current else {
      return;
    };
    let cells = self.entries[entry].cells.clone();

    for (i, &index) in cells.iter().enumerate() {
      let expected = self.entries[entry].answer()[i];
      let cell = self.grid.cell_mut(index);
      if !cell.locked && cell.letter != Some(expected) {
        cell.letter = Some(expected);
        let pos = cell.pos();
        self.emit(Event::CellChanged(pos));
      }
    }
    info!(entry = %self.entries[entry].id(), "entry revealed");

    for &index in &cells {
      self.check_entries_at(index);
    }
    self.submit();
  }

  /// Writes `letter` into the square at arena index `cell` unless it is locked, then
  /// checks every entry through that square.
  pub(crate) fn apply_letter(&mut self, cell: usize, letter: char) {
    let square = self.grid.cell_mut(cell);
    if square.locked {
      return;
    }
    let letter = letter.to_ascii_uppercase();
    square.letter = Some(letter);
    let pos = square.pos();
    debug!(?pos, %letter, "letter written");
    self.emit(Event::CellChanged(pos));
    self.check_entries_at(cell);
  }

  /// Checks both the across and down entry through a square, so that a letter can
  /// complete a crossing clue that isn't the current one.
  pub(crate) fn check_entries_at(&mut self, cell: usize) {
    let covering = self.grid.cell(cell).entries.clone();
    for entry in covering {
      self.check_entry(entry);
    }
  }

  /// Marks `entry` solved if its letters match the answer. Returns whether they do.
  pub(crate) fn check_entry(&mut self, entry: usize) -> bool {
    let correct = self.entries[entry].is_correct(&self.grid);
    if correct {
      self.mark_solved(entry);
    }
    correct
  }

  /// Locks the entry's squares and colours any that aren't coloured yet. Does nothing
  /// if the entry is already solved.
  pub(crate) fn mark_solved(&mut self, entry: usize) {
    if self.entries[entry].solved {
      return;
    }
    self.entries[entry].solved = true;
    let colour = Colour::for_clue(self.entries[entry].id());

    let mut changed = Vec::with_capacity(self.entries[entry].len());
    for &index in &self.entries[entry].cells {
      let cell = self.grid.cell_mut(index);
      if cell.base_colour.is_none() {
        cell.base_colour = colour;
      }
      cell.locked = true;
      changed.push(cell.pos());
    }
    for pos in changed {
      self.emit(Event::CellChanged(pos));
    }

    let id = self.entries[entry].id().to_string();
    info!(entry = %id, ?colour, "entry solved");
    self.emit(Event::EntrySolved(id));
    self.check_completion();
  }

  /// Finishes the puzzle the first time every entry matches its answer.
  pub(crate) fn check_completion(&mut self) {
    if self.complete {
      return;
    }
    if self.entries.iter().all(|e| e.is_correct(&self.grid)) {
      self.complete = true;
      // Every entry matches now, so settle the ones not marked yet before the share
      // grid is drawn from their colours.
      for entry in 0..self.entries.len() {
        self.mark_solved(entry);
      }
      info!("puzzle complete");
      let share = self.share_view();
      self.emit(Event::PuzzleCompleted(share));
    }
  }
}
