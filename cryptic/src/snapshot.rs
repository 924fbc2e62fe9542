//! Read-only views of a [Session] for renderers. Nothing here mutates state.

use crate::grid::{Cell, Colour, GREY_RGB};
use crate::hint::ClueHelp;
use crate::session::Session;
use crate::{Direction, Pos};

/// First line after the grid in the share text.
pub const SHARE_MESSAGE: &str = "I beat todays cryptic crossword!";
pub const SHARE_URL: &str = "https://mvpgarden.vercel.app/";

/// How a square should be painted. Grey wins over a base colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
  Block,
  White,
  Grey,
  Colour(Colour),
}

impl Fill {
  fn of(cell: &Cell) -> Self {
    if cell.is_block() {
      Fill::Block
    } else if cell.is_grey() {
      Fill::Grey
    } else if let Some(colour) = cell.base_colour() {
      Fill::Colour(colour)
    } else {
      Fill::White
    }
  }

  /// Background colour, or `None` for a block.
  pub fn rgb(self) -> Option<(u8, u8, u8)> {
    match self {
      Fill::Block => None,
      Fill::White => Some((0xff, 0xff, 0xff)),
      Fill::Grey => Some(GREY_RGB),
      Fill::Colour(colour) => Some(colour.rgb()),
    }
  }

  /// The emoji used for this square in the share text.
  pub fn share_glyph(self) -> char {
    match self {
      Fill::Block => '⬛',
      Fill::White | Fill::Grey => '⬜',
      Fill::Colour(Colour::Green) => '🟩',
      Fill::Colour(Colour::Yellow) => '🟨',
      Fill::Colour(Colour::Purple) => '🟪',
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
  pub pos: Pos,
  pub letter: Option<char>,
  pub fill: Fill,
  pub locked: bool,
  /// The cursor is on this square.
  pub active: bool,
  /// The cursor is not on this square, but the current entry includes it.
  pub highlighted: bool,
  pub numbers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
  pub rows: usize,
  pub cols: usize,
  /// Row-major.
  pub cells: Vec<CellView>,
}

impl GridView {
  pub fn get(&self, (row, col): Pos) -> Option<&CellView> {
    if row < self.rows && col < self.cols {
      self.cells.get(row * self.cols + col)
    } else {
      None
    }
  }

  /// Iterates the rows of the grid.
  pub fn rows(&self) -> impl Iterator<Item = &[CellView]> {
    self.cells.chunks(self.cols.max(1))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentView {
  pub text: String,
  /// The segment's role, e.g. `"definition"`, `"fodder"` or `"indicator"`.
  pub kind: String,
  /// The segment's own tooltip, else the default for its category. May be empty.
  pub tooltip: String,
}

impl SegmentView {
  pub fn is_definition(&self) -> bool {
    self.kind == "definition"
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClueBody {
  Surface(String),
  /// Annotated segments, followed by the answer length.
  Segments {
    segments: Vec<SegmentView>,
    enumeration: usize,
  },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueView {
  pub id: String,
  pub direction: Direction,
  /// e.g. `1A — Across`
  pub header: String,
  pub body: ClueBody,
  pub help: ClueHelp,
}

impl ClueView {
  /// The clue as plain text, with the enumeration in brackets for segmented clues.
  pub fn text(&self) -> String {
    match &self.body {
      ClueBody::Surface(surface) => surface.clone(),
      ClueBody::Segments {
        segments,
        enumeration,
      } => {
        let words: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        format!("{} ({})", words.join(" "), enumeration)
      }
    }
  }
}

/// The result grid shown once the puzzle is finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareView {
  /// One line of glyphs per grid row.
  pub rows: Vec<String>,
}

impl ShareView {
  /// The text copied to the clipboard: the grid, the message and the link.
  pub fn text(&self) -> String {
    let mut lines = self.rows.clone();
    lines.push(SHARE_MESSAGE.to_string());
    lines.push(SHARE_URL.to_string());
    lines.join("\n")
  }
}

/// Tooltip for a wordplay category when a segment doesn't bring its own.
pub fn default_tooltip(category: &str) -> Option<&'static str> {
  match category {
    "acrostic" => Some("Take first letters."),
    "hidden" => Some("Look within the fodder."),
    "anagram" => Some("Shuffle the letters."),
    "deletion" => Some("Remove letters."),
    "charade" => Some("Build from parts."),
    "lit" => Some("Whole clue is both definition and wordplay."),
    _ => None,
  }
}

impl Session {
  pub fn grid_view(&self) -> GridView {
    let active = self.active_pos();
    let current: Vec<Pos> = self
      .current_entry()
      .map(|e| e.positions(&self.grid).collect())
      .unwrap_or_default();

    let cells = self
      .grid
      .cells()
      .map(|cell| {
        let pos = cell.pos();
        let is_active = Some(pos) == active;
        CellView {
          pos,
          letter: cell.letter(),
          fill: Fill::of(cell),
          locked: cell.is_locked(),
          active: is_active,
          highlighted: !is_active && current.contains(&pos),
          numbers: cell.numbers().to_vec(),
        }
      })
      .collect();

    GridView {
      rows: self.grid.rows(),
      cols: self.grid.cols(),
      cells,
    }
  }

  /// The current entry's clue, or `None` if no entry is selected.
  pub fn clue_view(&self) -> Option<ClueView> {
    let entry = self.current_entry()?;
    let clue = entry.clue();

    let body = if clue.segments.is_empty() {
      ClueBody::Surface(clue.surface.clone().unwrap_or_default())
    } else {
      let segments = clue
        .segments
        .iter()
        .map(|segment| SegmentView {
          text: segment.text.clone(),
          kind: segment.kind.clone(),
          tooltip: segment
            .tooltip
            .clone()
            .or_else(|| {
              segment
                .category
                .as_deref()
                .and_then(default_tooltip)
                .map(String::from)
            })
            .unwrap_or_default(),
        })
        .collect();
      ClueBody::Segments {
        segments,
        enumeration: entry.len(),
      }
    };

    Some(ClueView {
      id: entry.id().to_string(),
      direction: entry.direction(),
      header: format!("{} — {}", entry.id(), entry.direction()),
      body,
      help: self.clue_help,
    })
  }

  pub fn share_view(&self) -> ShareView {
    let rows = self
      .grid_view()
      .rows()
      .map(|row| row.iter().map(|cell| cell.fill.share_glyph()).collect())
      .collect();
    ShareView { rows }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::HintKind;
  use crate::session::Event;
  use crate::testing::{crossing, type_word};

  #[test]
  fn grid_view_marks_cursor_and_entry() {
    let mut session = crossing();
    session.advance(crate::Step::Forward);
    type_word(&mut session, "X");
    let view = session.grid_view();

    let start = view.get((0, 0)).unwrap();
    assert!(start.highlighted && !start.active);
    assert_eq!(start.numbers, ["1"]);
    assert_eq!(view.get((0, 1)).unwrap().letter, Some('X'));
    assert!(view.get((0, 2)).unwrap().active);
    assert_eq!(view.get((1, 0)).unwrap().fill, Fill::Block);
    assert!(!view.get((1, 2)).unwrap().highlighted);
    assert_eq!(view.get((0, 2)).unwrap().numbers, ["2"]);
    assert!(view.get((3, 0)).is_none());
  }

  #[test]
  fn clue_views() {
    let mut session = crossing();
    let clue = session.clue_view().unwrap();
    assert_eq!(clue.header, "1A — Across");
    assert_eq!(clue.body, ClueBody::Surface("Pet".into()));
    assert_eq!(clue.text(), "Pet");

    session.activate_entry("2D");
    session.request_hint(HintKind::Wordplay);
    let clue = session.clue_view().unwrap();
    assert_eq!(clue.header, "2D — Down");
    assert!(clue.help.wordplay);
    let ClueBody::Segments {
      segments,
      enumeration,
    } = &clue.body
    else {
      panic!("expected segments, got {:?}", clue.body);
    };
    assert_eq!(*enumeration, 3);
    assert!(segments[0].is_definition());
    assert_eq!(segments[0].tooltip, "");
    assert_eq!(segments[1].tooltip, "Shuffle the letters.");
    assert_eq!(segments[2].tooltip, "Reverse it.");
    assert_eq!(clue.text(), "Best pot spun (3)");
  }

  #[test]
  fn share_grid_after_completion() {
    let mut session = crossing();
    session.activate_cell((1, 2));
    session.request_hint(HintKind::RevealLetter);
    let greyed = session
      .grid()
      .cells()
      .find(|c| c.is_grey())
      .map(|c| c.pos())
      .unwrap();

    session.activate_entry("1A");
    session.reveal_entry();
    session.activate_entry("2D");
    session.reveal_entry();
    assert!(session.is_complete());

    let share = session
      .take_events()
      .into_iter()
      .find_map(|e| match e {
        Event::PuzzleCompleted(share) => Some(share),
        _ => None,
      })
      .unwrap();
    assert_eq!(share, session.share_view());

    let mut expected: Vec<Vec<char>> = vec![
      "🟩🟩🟩".chars().collect(),
      "⬛⬛🟨".chars().collect(),
      "⬛⬛🟨".chars().collect(),
    ];
    expected[greyed.0][greyed.1] = '⬜';
    let expected: Vec<String> = expected.into_iter().map(|row| row.into_iter().collect()).collect();
    assert_eq!(share.rows, expected);

    let text = share.text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[3], SHARE_MESSAGE);
    assert_eq!(lines[4], SHARE_URL);
  }

  #[test]
  fn fill_precedence() {
    assert_eq!(Fill::Grey.share_glyph(), '⬜');
    assert_eq!(Fill::White.share_glyph(), '⬜');
    assert_eq!(Fill::Grey.rgb(), Some(GREY_RGB));
    assert_eq!(Fill::Block.rgb(), None);
    assert_eq!(Fill::Colour(Colour::Purple).share_glyph(), '🟪');
  }
}
