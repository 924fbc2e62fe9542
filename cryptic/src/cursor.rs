//! The cursor: which entry is current, and where in it the next letter goes.

use crate::Direction::Across;
use crate::entry::Entry;
use crate::session::{Event, Session};
use crate::{Arrow, Pos, Step};
use tracing::debug;

impl Session {
  /// The entry the cursor is in.
  pub fn current_entry(&self) -> Option<&Entry> {
    self.current.map(|index| &self.entries[index])
  }

  /// Position of the square where the next letter goes.
  pub fn active_pos(&self) -> Option<Pos> {
    let entry = self.current_entry()?;
    Some(self.grid.cell(entry.active_cell()).pos())
  }

  /// Selects the entry with the given id, keeping its cursor where it was.
  /// Returns false if there is no such entry.
  pub fn activate_entry(&mut self, id: &str) -> bool {
    match self.entry_index(id) {
      Some(index) => {
        self.set_active(index, None);
        true
      }
      None => false,
    }
  }

  /// Makes `entry` current. With an `origin` square the cursor moves onto it (or to the
  /// start if the entry doesn't contain it). If the cursor then sits on a locked square
  /// it moves to the nearest unlocked one, looking forwards first.
  pub(crate) fn set_active(&mut self, entry: usize, origin: Option<Pos>) {
    let before = self.active_pos();
    self.current = Some(entry);
    self.clue_help = Default::default();

    if let Some(pos) = origin {
      let found = self
        .grid
        .index(pos)
        .and_then(|index| self.entries[entry].position_of(index));
      self.entries[entry].active = found.unwrap_or(0);
    }

    if self.grid.cell(self.entries[entry].active_cell()).is_locked() {
      let target = self.entries[entry]
        .next_unlocked(&self.grid, Step::Forward)
        .or_else(|| self.entries[entry].next_unlocked(&self.grid, Step::Backward));
      if let Some(i) = target {
        self.entries[entry].active = i;
      }
    }

    let id = self.entries[entry].id().to_string();
    debug!(entry = %id, index = self.entries[entry].active, "entry activated");
    self.emit(Event::EntryActivated(id));
    self.cursor_moved(before);
  }

  /// Moves the cursor one square along the current entry, skipping locked squares.
  /// Returns the position it landed on, or `None` (leaving the cursor alone) if there
  /// is no unlocked square that way.
  pub fn advance(&mut self, step: Step) -> Option<Pos> {
    let before = self.active_pos();
    let entry = self.current?;
    let i = self.entries[entry].next_unlocked(&self.grid, step)?;
    self.entries[entry].active = i;
    self.cursor_moved(before);
    self.active_pos()
  }

  /// Handles a click or tap on a square. A square in both an across and a down entry
  /// remembers which direction was last chosen there, and clicking it twice in a row
  /// flips to the other one.
  pub fn activate_cell(&mut self, pos: Pos) {
    let Some(cell) = self.grid.get(pos) else {
      return;
    };
    if cell.is_block() || cell.entries.is_empty() {
      return;
    }

    let mut preference = self.direction_prefs.get(&pos).copied().unwrap_or(Across);
    if self.last_activated == Some(pos) {
      preference = !preference;
    }
    self.last_activated = Some(pos);

    let entry = cell
      .entries
      .iter()
      .copied()
      .find(|&e| self.entries[e].direction() == preference)
      .unwrap_or(cell.entries[0]);
    self.direction_prefs.insert(pos, self.entries[entry].direction());
    self.set_active(entry, Some(pos));
  }

  /// Switches to the other entry through the cursor's square, if there is one, and
  /// remembers that direction for the square.
  pub fn toggle_direction(&mut self) {
    let (Some(pos), Some(current)) = (self.active_pos(), self.current) else {
      return;
    };
    let Some(cell) = self.grid.get(pos) else {
      return;
    };
    let Some(other) = cell.entries.iter().copied().find(|&e| e != current) else {
      return;
    };

    let direction = self.entries[other].direction();
    debug!(?pos, %direction, "direction toggled");
    self.direction_prefs.insert(pos, direction);
    self.last_activated = Some(pos);
    self.set_active(other, Some(pos));
  }

  /// Moves to the next playable square on the grid in the direction of `arrow`, staying
  /// in the current direction if an entry runs that way through the new square.
  pub fn move_in_grid(&mut self, arrow: Arrow) {
    let Some(from) = self.active_pos() else {
      return;
    };
    let Some(to) = self.grid.next_playable(from, arrow) else {
      return;
    };
    let Some(cell) = self.grid.get(to) else {
      return;
    };

    let direction = self
      .current_entry()
      .map(|e| e.direction())
      .unwrap_or(arrow.direction());
    let entry = cell
      .entries
      .iter()
      .copied()
      .find(|&e| self.entries[e].direction() == direction)
      .unwrap_or(cell.entries[0]);
    self.set_active(entry, Some(to));
  }

  /// Selects the entry after the current one in puzzle order. Returns false, changing
  /// nothing, if the current entry is the last.
  pub fn activate_next_entry(&mut self) -> bool {
    let next = self.current.map_or(0, |index| index + 1);
    if next >= self.entries.len() {
      return false;
    }
    self.set_active(next, None);
    true
  }

  /// Selects the next or previous entry, wrapping around at either end.
  pub fn cycle_entry(&mut self, step: Step) {
    let count = self.entries.len() as isize;
    let index = match self.current {
      Some(index) => (index as isize + step.delta()).rem_euclid(count),
      None => 0,
    };
    self.set_active(index as usize, None);
  }

  /// Queues change events for the squares the cursor left and landed on.
  pub(crate) fn cursor_moved(&mut self, before: Option<Pos>) {
    let after = self.active_pos();
    if before == after {
      return;
    }
    if let Some(pos) = before {
      self.emit(Event::CellChanged(pos));
    }
    if let Some(pos) = after {
      self.emit(Event::CellChanged(pos));
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::Direction::{Across, Down};
  use crate::session::Event;
  use crate::testing::{crossing, single, type_word};
  use crate::{Arrow, Step};

  #[test]
  fn advance_stops_at_the_ends() {
    let mut session = single("CAT");
    assert_eq!(session.advance(Step::Backward), None);
    assert_eq!(session.active_pos(), Some((0, 0)));
    assert_eq!(session.advance(Step::Forward), Some((0, 1)));
    assert_eq!(session.advance(Step::Forward), Some((0, 2)));
    assert_eq!(session.advance(Step::Forward), None);
    assert_eq!(session.active_pos(), Some((0, 2)));
  }

  #[test]
  fn skips_locked_squares() {
    let mut session = single("CAT");
    session.grid.cell_mut(0).locked = true;

    // Activating lands on the first unlocked square, not the locked start.
    session.set_active(0, None);
    assert_eq!(session.current_entry().unwrap().active_index(), 1);

    session.grid.cell_mut(1).locked = true;
    session.set_active(0, Some((0, 0)));
    assert_eq!(session.active_pos(), Some((0, 2)));
    // Nothing unlocked behind the cursor.
    assert_eq!(session.advance(Step::Backward), None);
    assert_eq!(session.active_pos(), Some((0, 2)));
  }

  #[test]
  fn locked_end_falls_back_to_earlier_square() {
    let mut session = single("CAT");
    session.grid.cell_mut(2).locked = true;
    session.set_active(0, Some((0, 2)));
    assert_eq!(session.active_pos(), Some((0, 1)));
  }

  #[test]
  fn click_toggles_direction_on_shared_square() {
    let mut session = crossing();

    // Squares in only one entry always select it.
    session.activate_cell((2, 2));
    assert_eq!(session.current_entry().unwrap().id(), "2D");
    assert_eq!(session.active_pos(), Some((2, 2)));

    session.activate_cell((0, 2));
    assert_eq!(session.current_entry().unwrap().direction(), Across);
    assert_eq!(session.active_pos(), Some((0, 2)));

    session.activate_cell((0, 2));
    assert_eq!(session.current_entry().unwrap().direction(), Down);

    session.activate_cell((0, 2));
    assert_eq!(session.current_entry().unwrap().direction(), Across);

    // Coming back after clicking elsewhere remembers the last choice.
    session.activate_cell((0, 2));
    session.activate_cell((0, 0));
    session.activate_cell((0, 2));
    assert_eq!(session.current_entry().unwrap().direction(), Down);
  }

  #[test]
  fn toggle_flips_on_first_press() {
    let mut session = crossing();
    session.move_in_grid(Arrow::Right);
    session.move_in_grid(Arrow::Right);
    assert_eq!(session.active_pos(), Some((0, 2)));

    session.toggle_direction();
    assert_eq!(session.current_entry().unwrap().id(), "2D");
    assert_eq!(session.active_pos(), Some((0, 2)));
    session.toggle_direction();
    assert_eq!(session.current_entry().unwrap().id(), "1A");
    session.toggle_direction();

    // The toggled direction is remembered for later clicks on the square.
    session.activate_cell((0, 0));
    session.activate_cell((0, 2));
    assert_eq!(session.current_entry().unwrap().direction(), Down);
  }

  #[test]
  fn toggle_on_unshared_square_does_nothing() {
    let mut session = crossing();
    session.take_events();
    session.toggle_direction();
    assert_eq!(session.current_entry().unwrap().id(), "1A");
    assert!(session.take_events().is_empty());
  }

  #[test]
  fn clicks_on_blocks_and_outside_are_ignored() {
    let mut session = crossing();
    session.take_events();
    session.activate_cell((1, 1));
    session.activate_cell((7, 7));
    assert_eq!(session.current_entry().unwrap().id(), "1A");
    assert!(session.take_events().is_empty());
  }

  #[test]
  fn cursor_events() {
    let mut session = single("CAT");
    session.take_events();
    session.advance(Step::Forward);
    assert_eq!(
      session.take_events(),
      [Event::CellChanged((0, 0)), Event::CellChanged((0, 1))]
    );
    session.advance(Step::Backward);
    session.advance(Step::Backward);
    assert_eq!(
      session.take_events(),
      [Event::CellChanged((0, 1)), Event::CellChanged((0, 0))]
    );
  }

  #[test]
  fn move_in_grid_prefers_current_direction() {
    let mut session = crossing();
    session.move_in_grid(Arrow::Right);
    session.move_in_grid(Arrow::Right);
    assert_eq!(session.active_pos(), Some((0, 2)));
    assert_eq!(session.current_entry().unwrap().id(), "1A");

    // Nothing further right.
    session.move_in_grid(Arrow::Right);
    assert_eq!(session.active_pos(), Some((0, 2)));

    // Down out of the across entry switches to the down one.
    session.move_in_grid(Arrow::Down);
    assert_eq!(session.current_entry().unwrap().id(), "2D");
    assert_eq!(session.active_pos(), Some((1, 2)));

    // Blocks are skipped: nothing playable to the left of (1, 2).
    session.move_in_grid(Arrow::Left);
    assert_eq!(session.active_pos(), Some((1, 2)));

    session.move_in_grid(Arrow::Up);
    assert_eq!(session.active_pos(), Some((0, 2)));
    assert_eq!(session.current_entry().unwrap().id(), "2D");
  }

  #[test]
  fn entry_order() {
    let mut session = crossing();
    assert!(session.activate_next_entry());
    assert_eq!(session.current_entry().unwrap().id(), "2D");
    assert!(!session.activate_next_entry());
    assert_eq!(session.current_entry().unwrap().id(), "2D");

    session.cycle_entry(Step::Forward);
    assert_eq!(session.current_entry().unwrap().id(), "1A");
    session.cycle_entry(Step::Backward);
    assert_eq!(session.current_entry().unwrap().id(), "2D");

    assert!(session.activate_entry("1A"));
    assert!(!session.activate_entry("9Z"));
  }

  #[test]
  fn typing_after_solve_skips_locked_crossing() {
    let mut session = crossing();
    type_word(&mut session, "CAT");
    assert!(session.current_entry().unwrap().is_solved());

    session.activate_cell((0, 2));
    session.activate_cell((0, 2));
    assert_eq!(session.current_entry().unwrap().id(), "2D");
    assert_eq!(session.active_pos(), Some((1, 2)));
  }
}
