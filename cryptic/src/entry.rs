use crate::document::{ClueDef, EntryDef};
use crate::grid::Grid;
use crate::{Direction, Error, Pos, Result, Step};
use std::collections::HashSet;

/// One clue's answer slot: a run of squares in one direction, plus the cursor position
/// within it.
#[derive(Debug, Clone)]
pub struct Entry {
  id: String,
  direction: Direction,
  origin: Pos,
  answer: Vec<char>,
  clue: ClueDef,
  /// Arena indices of the squares, one per answer character.
  pub(crate) cells: Vec<usize>,
  /// Index into `cells` where the next letter goes.
  pub(crate) active: usize,
  pub(crate) solved: bool,
}

impl Entry {
  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn direction(&self) -> Direction {
    self.direction
  }

  /// Position of the first square.
  pub fn origin(&self) -> Pos {
    self.origin
  }

  /// The uppercased answer.
  pub fn answer(&self) -> &[char] {
    &self.answer
  }

  pub fn clue(&self) -> &ClueDef {
    &self.clue
  }

  pub fn len(&self) -> usize {
    self.cells.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  pub fn is_solved(&self) -> bool {
    self.solved
  }

  /// The cursor's index within this entry.
  pub fn active_index(&self) -> usize {
    self.active
  }

  pub(crate) fn active_cell(&self) -> usize {
    self.cells[self.active]
  }

  /// Positions of this entry's squares, in answer order.
  pub fn positions<'a>(&'a self, grid: &'a Grid) -> impl Iterator<Item = Pos> + 'a {
    self.cells.iter().map(|&index| grid.cell(index).pos())
  }

  /// The index within this entry of the square at arena index `cell`.
  pub(crate) fn position_of(&self, cell: usize) -> Option<usize> {
    self.cells.iter().position(|&c| c == cell)
  }

  /// The letters currently entered, with blanks as spaces.
  pub fn guess(&self, grid: &Grid) -> String {
    self
      .cells
      .iter()
      .map(|&index| grid.cell(index).letter().unwrap_or(' '))
      .collect()
  }

  /// Whether every square holds the matching answer letter.
  pub fn is_correct(&self, grid: &Grid) -> bool {
    self.mismatches(grid).next().is_none()
  }

  /// `(arena index, answer index)` for every square that doesn't match the answer yet.
  pub(crate) fn mismatches<'a>(&'a self, grid: &'a Grid) -> impl Iterator<Item = (usize, usize)> + 'a {
    self
      .cells
      .iter()
      .zip(&self.answer)
      .enumerate()
      .filter(|(_, (index, expected))| grid.cell(**index).letter() != Some(**expected))
      .map(|(i, (&index, _))| (index, i))
  }

  /// The nearest unlocked index from the cursor in the direction of `step`, not counting
  /// the cursor's own square. `None` at the end of the entry.
  pub(crate) fn next_unlocked(&self, grid: &Grid, step: Step) -> Option<usize> {
    let mut i = self.active as isize;
    loop {
      i += step.delta();
      if i < 0 || i as usize >= self.cells.len() {
        return None;
      }
      if !grid.cell(self.cells[i as usize]).is_locked() {
        return Some(i as usize);
      }
    }
  }

  pub(crate) fn reset(&mut self) {
    self.active = 0;
    self.solved = false;
  }
}

/// Builds the entries, binding each to its squares and recording the back-references
/// on the squares.
///
/// Every answer character must land on a playable square; a path that runs off the
/// grid or into a block would misalign letters with the answer, so it is rejected.
pub(crate) fn build_entries(grid: &mut Grid, defs: &[EntryDef]) -> Result<Vec<Entry>> {
  if defs.is_empty() {
    return Err(Error::MalformedDocument("the puzzle has no entries".into()));
  }

  let mut seen = HashSet::new();
  let mut entries = Vec::with_capacity(defs.len());

  for (entry_index, def) in defs.iter().enumerate() {
    if !seen.insert(def.id.as_str()) {
      return Err(Error::MalformedDocument(format!("duplicate entry id {}", def.id)));
    }

    let answer: Vec<char> = def.answer.chars().flat_map(char::to_uppercase).collect();
    if answer.is_empty() {
      return Err(Error::MalformedDocument(format!("entry {} has an empty answer", def.id)));
    }

    let mut cells = Vec::with_capacity(answer.len());
    for i in 0..answer.len() {
      let pos = match def.direction {
        Direction::Across => (def.row, def.col + i),
        Direction::Down => (def.row + i, def.col),
      };
      let index = grid
        .index(pos)
        .filter(|&index| !grid.cell(index).is_block())
        .ok_or_else(|| {
          Error::MalformedDocument(format!(
            "entry {} runs onto a block or off the grid at {:?}",
            def.id, pos
          ))
        })?;
      cells.push(index);
    }

    for &index in &cells {
      grid.cell_mut(index).entries.push(entry_index);
    }

    entries.push(Entry {
      id: def.id.clone(),
      direction: def.direction,
      origin: (def.row, def.col),
      answer,
      clue: def.clue.clone(),
      cells,
      active: 0,
      solved: false,
    });
  }

  Ok(entries)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::document::PuzzleDocument;

  fn build(json: serde_json::Value) -> Result<(Grid, Vec<Entry>)> {
    let doc: PuzzleDocument = serde_json::from_value(json).unwrap();
    let mut grid = Grid::build(&doc.grid)?;
    let entries = build_entries(&mut grid, &doc.entries)?;
    Ok((grid, entries))
  }

  #[test]
  fn cells_align_with_answers() {
    let (grid, entries) = build(serde_json::json!({
      "grid": { "rows": 3, "cols": 3, "blocks": [[1, 1]] },
      "entries": [
        { "id": "1A", "direction": "across", "row": 0, "col": 0, "answer": "top" },
        { "id": "1D", "direction": "down", "row": 0, "col": 0, "answer": "tan" },
        { "id": "2D", "direction": "down", "row": 0, "col": 2, "answer": "pit" },
        { "id": "3A", "direction": "across", "row": 2, "col": 0, "answer": "nut" }
      ]
    }))
    .unwrap();

    for entry in &entries {
      assert_eq!(entry.len(), entry.answer().len());
    }
    assert_eq!(entries[0].answer(), ['T', 'O', 'P']);
    assert_eq!(
      entries[1].positions(&grid).collect::<Vec<_>>(),
      [(0, 0), (1, 0), (2, 0)]
    );

    // Corners are shared by one across and one down entry.
    assert_eq!(grid.get((0, 0)).unwrap().entries, [0, 1]);
    assert_eq!(grid.get((2, 2)).unwrap().entries, [2, 3]);
    assert_eq!(grid.get((0, 1)).unwrap().entries, [0]);
    assert!(grid.get((1, 1)).unwrap().entries.is_empty());
  }

  #[test]
  fn entry_into_block_is_malformed() {
    let result = build(serde_json::json!({
      "grid": { "rows": 1, "cols": 3, "blocks": [[0, 1]] },
      "entries": [ { "id": "1A", "direction": "across", "row": 0, "col": 0, "answer": "abc" } ]
    }));
    assert!(matches!(result, Err(Error::MalformedDocument(_))));
  }

  #[test]
  fn entry_off_grid_is_malformed() {
    let result = build(serde_json::json!({
      "grid": { "rows": 2, "cols": 2 },
      "entries": [ { "id": "1D", "direction": "down", "row": 0, "col": 1, "answer": "abc" } ]
    }));
    assert!(matches!(result, Err(Error::MalformedDocument(_))));
  }

  #[test]
  fn empty_and_duplicate_entries_are_malformed() {
    let empty = build(serde_json::json!({ "grid": { "rows": 1, "cols": 1 }, "entries": [] }));
    assert!(matches!(empty, Err(Error::MalformedDocument(_))));

    let duplicate = build(serde_json::json!({
      "grid": { "rows": 1, "cols": 2 },
      "entries": [
        { "id": "1A", "direction": "across", "row": 0, "col": 0, "answer": "ab" },
        { "id": "1A", "direction": "across", "row": 0, "col": 0, "answer": "ab" }
      ]
    }));
    assert!(matches!(duplicate, Err(Error::MalformedDocument(_))));

    let blank = build(serde_json::json!({
      "grid": { "rows": 1, "cols": 2 },
      "entries": [ { "id": "1A", "direction": "across", "row": 0, "col": 0, "answer": "" } ]
    }));
    assert!(matches!(blank, Err(Error::MalformedDocument(_))));
  }

  #[test]
  fn guess_and_mismatches() {
    let (mut grid, entries) = build(serde_json::json!({
      "grid": { "rows": 1, "cols": 3 },
      "entries": [ { "id": "1A", "direction": "across", "row": 0, "col": 0, "answer": "cat" } ]
    }))
    .unwrap();
    let entry = &entries[0];

    assert_eq!(entry.guess(&grid), "   ");
    grid.cell_mut(0).letter = Some('C');
    grid.cell_mut(2).letter = Some('X');
    assert_eq!(entry.guess(&grid), "C X");
    assert_eq!(entry.mismatches(&grid).collect::<Vec<_>>(), [(1, 1), (2, 2)]);
    assert!(!entry.is_correct(&grid));

    grid.cell_mut(1).letter = Some('A');
    grid.cell_mut(2).letter = Some('T');
    assert!(entry.is_correct(&grid));
  }
}
