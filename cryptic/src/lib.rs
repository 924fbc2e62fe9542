//! This crate is the puzzle-state engine behind a cryptic crossword player.
//! It provides no UI itself, but see `cryptictui` for an example of how you can use it
//! to produce a crossword app.
//!
//! Puzzles are described by a JSON [PuzzleDocument]: grid dimensions, blocks, numbering
//! and a list of entries with their answers and clue text. A [Session] owns everything
//! that changes while solving: letters, colours, locks, hint markers and the cursor.
//! Hosts feed it [Command]s, drain the [Event]s it queues, and draw from the read-only
//! views in [snapshot].

use Direction::{Across, Down};
use std::fmt::Display;
use std::ops::Not;

mod cursor;
mod document;
mod entry;
mod grid;
mod hint;
mod load;
mod session;
pub mod snapshot;
mod solve;

pub use document::{ClueDef, EntryDef, GridDef, Label, NumberDef, Numbers, PuzzleDocument, SegmentDef};
pub use entry::Entry;
pub use grid::{Cell, Colour, GREY_RGB, Grid};
pub use hint::{ClueHelp, HintKind};
pub use load::{DEFAULT_PUZZLE_FILE, load_session, read_document};
pub use session::{Command, Event, Session, SessionOptions};

/// The two crossword directions: `Across` and `Down`
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Across,
  Down,
}

impl Not for Direction {
  type Output = Self;
  fn not(self) -> Self {
    match self {
      Across => Down,
      Down => Across,
    }
  }
}

impl Display for Direction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Across => write!(f, "Across"),
      Down => write!(f, "Down"),
    }
  }
}

/// A position in a grid: (row, column)
pub type Pos = (usize, usize);

/// Which way to move the cursor within the current entry.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Step {
  Forward,
  Backward,
}

impl Step {
  fn delta(self) -> isize {
    match self {
      Step::Forward => 1,
      Step::Backward => -1,
    }
  }
}

/// A move across the grid itself, regardless of the current entry.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Arrow {
  Up,
  Down,
  Left,
  Right,
}

impl Arrow {
  /// The direction of entries that run along this arrow.
  pub fn direction(self) -> Direction {
    match self {
      Arrow::Up | Arrow::Down => Down,
      Arrow::Left | Arrow::Right => Across,
    }
  }
}

/// The errors that may be produced by functions in this crate. They only occur while
/// loading a puzzle; once a [Session] exists every operation degrades to a no-op.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The document parsed, but describes a puzzle that can't be played.
  #[error("malformed puzzle document: {0}")]
  MalformedDocument(String),
  /// The document isn't valid JSON, or is missing required fields.
  #[error("invalid puzzle JSON: {0}")]
  Json(#[from] serde_json::Error),
  /// An [I/O error](std::io::Error) occurred.
  #[error("could not read puzzle: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
