//! Hints. Every hint greys at least one square, which shows up in the share grid.

use crate::session::{Event, Session};
use rand::seq::SliceRandom;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintKind {
  /// Fill one wrong or empty square of the current entry with its answer letter.
  RevealLetter,
  /// Grey a square without changing any letters.
  Grey,
  /// Toggle highlighting of the definition in the clue.
  Definition,
  /// Toggle the wordplay annotations in the clue.
  Wordplay,
}

/// The annotation layers switched on for the current clue. Cleared whenever an entry
/// is activated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClueHelp {
  pub definition: bool,
  pub wordplay: bool,
}

impl Session {
  /// Applies a hint to the current entry. Does nothing without one.
  pub fn request_hint(&mut self, kind: HintKind) {
    let Some(entry) = self.current else {
      return;
    };
    match kind {
      HintKind::RevealLetter => self.reveal_letter(entry),
      HintKind::Grey => self.grey_reveal(entry),
      HintKind::Definition => {
        self.clue_help.definition = !self.clue_help.definition;
        if self.clue_help.definition {
          self.grey_reveal(entry);
        }
      }
      HintKind::Wordplay => {
        self.clue_help.wordplay = !self.clue_help.wordplay;
        if self.clue_help.wordplay {
          self.grey_reveal(entry);
        }
      }
    }
  }

  /// Puts the right letter in one randomly chosen square that doesn't have it yet,
  /// greys that square and moves the cursor there. Skipped for solved entries and for
  /// entries whose letters are already all correct.
  pub(crate) fn reveal_letter(&mut self, entry: usize) {
    if self.entries[entry].solved {
      return;
    }
    let candidates: Vec<(usize, usize)> = self.entries[entry]
      .mismatches(&self.grid)
      .filter(|&(index, _)| !self.grid.cell(index).is_locked())
      .collect();
    let Some(&(index, i)) = candidates.choose(&mut self.rng) else {
      return;
    };

    let before = self.active_pos();
    let letter = self.entries[entry].answer()[i];
    let cell = self.grid.cell_mut(index);
    cell.letter = Some(letter);
    cell.is_grey = true;
    let pos = cell.pos();
    debug!(entry = %self.entries[entry].id(), ?pos, %letter, "letter revealed");
    self.emit(Event::CellChanged(pos));

    self.entries[entry].active = i;
    self.check_entries_at(index);
    self.cursor_moved(before);
  }

  /// Greys a random square of the entry, preferring one that isn't grey yet. Letters
  /// are untouched, but the entry is checked afterwards in case it was already right.
  pub(crate) fn grey_reveal(&mut self, entry: usize) {
    if self.entries[entry].solved {
      return;
    }
    let cells = &self.entries[entry].cells;
    let fresh: Vec<usize> = cells
      .iter()
      .copied()
      .filter(|&index| !self.grid.cell(index).is_grey())
      .collect();
    let pool = if fresh.is_empty() { cells.clone() } else { fresh };
    let Some(&index) = pool.choose(&mut self.rng) else {
      return;
    };

    let cell = self.grid.cell_mut(index);
    if !cell.is_grey {
      cell.is_grey = true;
      let pos = cell.pos();
      debug!(entry = %self.entries[entry].id(), ?pos, "square greyed");
      self.emit(Event::CellChanged(pos));
    }
    self.check_entry(entry);
  }
}
