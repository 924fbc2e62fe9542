use crate::document::GridDef;
use crate::{Arrow, Error, Pos, Result};
use std::fmt::{Debug, Display};

/// The highlight a square takes on when an entry covering it is solved. Both the
/// across and down clues with the same number share a colour.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Colour {
  Green,
  Yellow,
  Purple,
}

/// The most squares a grid may have. Larger documents are rejected as malformed.
pub const MAX_SQUARES: usize = 10_000;

/// Painted over the base colour on squares a hint has touched.
pub const GREY_RGB: (u8, u8, u8) = (0xbb, 0xbb, 0xbb);

impl Colour {
  /// Looks up the colour for a clue id from its leading number. Only clues 1-3 are
  /// coloured.
  pub fn for_clue(id: &str) -> Option<Self> {
    let end = id.find(|c: char| !c.is_ascii_digit()).unwrap_or(id.len());
    match &id[..end] {
      "1" => Some(Colour::Green),
      "2" => Some(Colour::Yellow),
      "3" => Some(Colour::Purple),
      _ => None,
    }
  }

  /// Light enough that black letters stay legible on top.
  pub fn rgb(self) -> (u8, u8, u8) {
    match self {
      Colour::Green => (0xa8, 0xe6, 0xa8),
      Colour::Yellow => (0xff, 0xf5, 0x9d),
      Colour::Purple => (0xd8, 0xb4, 0xfe),
    }
  }
}

/// A square in a crossword grid.
#[derive(Clone, PartialEq, Eq)]
pub struct Cell {
  pos: Pos,
  is_block: bool,
  pub(crate) letter: Option<char>,
  pub(crate) base_colour: Option<Colour>,
  pub(crate) is_grey: bool,
  pub(crate) locked: bool,
  /// Indices of the entries running through this square: at most one across and one down.
  pub(crate) entries: Vec<usize>,
  numbers: Vec<String>,
}

impl Cell {
  fn new(pos: Pos) -> Self {
    Self {
      pos,
      is_block: false,
      letter: None,
      base_colour: None,
      is_grey: false,
      locked: false,
      entries: vec![],
      numbers: vec![],
    }
  }

  pub fn pos(&self) -> Pos {
    self.pos
  }

  /// Whether this is a black square where nothing can be entered.
  pub fn is_block(&self) -> bool {
    self.is_block
  }

  pub fn letter(&self) -> Option<char> {
    self.letter
  }

  pub fn base_colour(&self) -> Option<Colour> {
    self.base_colour
  }

  /// Whether a hint has touched this square.
  pub fn is_grey(&self) -> bool {
    self.is_grey
  }

  /// Whether an entry covering this square has been solved, freezing its letter.
  pub fn is_locked(&self) -> bool {
    self.locked
  }

  /// Clue numbers printed in the corner of this square.
  pub fn numbers(&self) -> &[String] {
    &self.numbers
  }

  fn reset(&mut self) {
    self.letter = None;
    self.base_colour = None;
    self.is_grey = false;
    self.locked = false;
  }
}

impl Debug for Cell {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match (self.is_block, self.letter) {
      (true, _) => write!(f, "■"),
      (false, None) => write!(f, " "),
      (false, Some(c)) => write!(f, "{}", c),
    }
  }
}

impl Display for Cell {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}", self)
  }
}

/// The arena of squares. Entries refer to squares by their index in here, so each
/// letter has exactly one home no matter how many clues share it.
#[derive(Clone)]
pub struct Grid {
  rows: usize,
  cols: usize,
  cells: Vec<Cell>,
}

impl Grid {
  /// Lays out the squares, then marks blocks and attaches numbers. Coordinates outside
  /// the grid are skipped, as are numbers that land on a block. Fails if the grid has
  /// more than [MAX_SQUARES] squares.
  pub(crate) fn build(def: &GridDef) -> Result<Self> {
    let size = def
      .rows
      .checked_mul(def.cols)
      .filter(|&size| size <= MAX_SQUARES)
      .ok_or_else(|| {
        Error::MalformedDocument(format!("a {}x{} grid is too large", def.rows, def.cols))
      })?;

    let mut cells = Vec::with_capacity(size);
    for row in 0..def.rows {
      for col in 0..def.cols {
        cells.push(Cell::new((row, col)));
      }
    }

    let mut grid = Self {
      rows: def.rows,
      cols: def.cols,
      cells,
    };

    for &(row, col) in &def.blocks {
      if let Some(index) = grid.index_signed(row, col) {
        grid.cells[index].is_block = true;
      }
    }

    for (row, col, label) in &def.numbers.all {
      if let Some(index) = grid.index_signed(*row, *col) {
        let cell = &mut grid.cells[index];
        if !cell.is_block {
          cell.numbers.push(label.to_string());
        }
      }
    }

    Ok(grid)
  }

  /// The number of rows in this grid.
  pub fn rows(&self) -> usize {
    self.rows
  }

  /// The number of columns in this grid.
  pub fn cols(&self) -> usize {
    self.cols
  }

  /// The arena index of `pos`, or `None` if it lies outside the grid.
  pub fn index(&self, (row, col): Pos) -> Option<usize> {
    (row < self.rows && col < self.cols).then(|| row * self.cols + col)
  }

  fn index_signed(&self, row: i64, col: i64) -> Option<usize> {
    let row = usize::try_from(row).ok()?;
    let col = usize::try_from(col).ok()?;
    self.index((row, col))
  }

  /// Returns the [Cell] at the given [Pos].
  pub fn get(&self, pos: Pos) -> Option<&Cell> {
    self.index(pos).map(|index| &self.cells[index])
  }

  pub(crate) fn cell(&self, index: usize) -> &Cell {
    &self.cells[index]
  }

  pub(crate) fn cell_mut(&mut self, index: usize) -> &mut Cell {
    &mut self.cells[index]
  }

  /// All squares, left to right and top to bottom.
  pub fn cells(&self) -> impl Iterator<Item = &Cell> {
    self.cells.iter()
  }

  /// Returns the position of the next square from `pos` in the direction of `arrow`
  /// that belongs to at least one entry, skipping blocks and unused squares.
  pub(crate) fn next_playable(&self, pos: Pos, arrow: Arrow) -> Option<Pos> {
    let (mut row, mut col) = pos;
    loop {
      match arrow {
        Arrow::Up if row > 0 => row -= 1,
        Arrow::Down if row + 1 < self.rows => row += 1,
        Arrow::Left if col > 0 => col -= 1,
        Arrow::Right if col + 1 < self.cols => col += 1,
        _ => return None,
      }
      let cell = self.get((row, col))?;
      if !cell.is_block && !cell.entries.is_empty() {
        return Some((row, col));
      }
    }
  }

  /// Clears every mutable field, leaving the shape and numbering alone.
  pub(crate) fn reset(&mut self) {
    for cell in &mut self.cells {
      cell.reset();
    }
  }
}

impl Debug for Grid {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for row in self.cells.chunks(self.cols.max(1)) {
      for cell in row {
        write!(f, "{}", cell)?;
      }
      writeln!(f)?;
    }
    Ok(())
  }
}

impl Display for Grid {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "\n{:?}", self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::document::{Label, Numbers};

  fn def(rows: usize, cols: usize, blocks: Vec<(i64, i64)>, numbers: Vec<(i64, i64, Label)>) -> GridDef {
    GridDef {
      rows,
      cols,
      blocks,
      numbers: Numbers { all: numbers },
    }
  }

  #[test]
  fn blocks_and_numbers() {
    let grid = Grid::build(&def(
      3,
      4,
      vec![(0, 2), (2, 1)],
      vec![(0, 0, Label::Number(1u64.into())), (1, 3, Label::Text("4".into()))],
    ))
    .unwrap();

    #[rustfmt::skip]
    assert_eq!(
      grid.to_string(),
      concat!(
        "\n",
        "  ■ \n",
        "    \n",
        " ■  \n",
      )
    );

    assert_eq!(grid.get((0, 0)).unwrap().numbers(), ["1"]);
    assert_eq!(grid.get((1, 3)).unwrap().numbers(), ["4"]);
    assert!(grid.get((0, 1)).unwrap().numbers().is_empty());
  }

  #[test]
  fn out_of_range_coordinates_are_skipped() {
    let grid = Grid::build(&def(
      2,
      2,
      vec![(5, 0), (-1, 1), (0, 2), (1, 1)],
      vec![
        (9, 9, Label::Number(1u64.into())),
        (0, -3, Label::Number(2u64.into())),
        (1, 1, Label::Number(3u64.into())),
      ],
    ))
    .unwrap();

    let blocks: Vec<Pos> = grid.cells().filter(|c| c.is_block()).map(|c| c.pos()).collect();
    assert_eq!(blocks, [(1, 1)]);
    // The only in-range number sits on a block.
    assert!(grid.cells().all(|c| c.numbers().is_empty()));
    assert!(grid.get((2, 0)).is_none());
  }

  #[test]
  fn oversized_grids_are_malformed() {
    let huge = Grid::build(&def(1 << 33, 1 << 33, vec![], vec![]));
    assert!(matches!(huge, Err(Error::MalformedDocument(_))));
    let wide = Grid::build(&def(1, MAX_SQUARES + 1, vec![], vec![]));
    assert!(matches!(wide, Err(Error::MalformedDocument(_))));
    assert_eq!(Grid::build(&def(100, 100, vec![], vec![])).unwrap().cells().count(), MAX_SQUARES);
  }

  #[test]
  fn colours_by_leading_number() {
    assert_eq!(Colour::for_clue("1A"), Some(Colour::Green));
    assert_eq!(Colour::for_clue("1D"), Some(Colour::Green));
    assert_eq!(Colour::for_clue("2D"), Some(Colour::Yellow));
    assert_eq!(Colour::for_clue("3"), Some(Colour::Purple));
    assert_eq!(Colour::for_clue("12A"), None);
    assert_eq!(Colour::for_clue("4A"), None);
    assert_eq!(Colour::for_clue("A1"), None);
  }
}
