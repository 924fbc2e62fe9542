use crate::document::PuzzleDocument;
use crate::entry::{Entry, build_entries};
use crate::grid::Grid;
use crate::hint::{ClueHelp, HintKind};
use crate::snapshot::ShareView;
use crate::{Arrow, Direction, Pos, Result, Step};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use tracing::{debug, info};

/// Options fixed for the lifetime of a [Session].
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
  /// Seeds the hint picker. `None` seeds from the operating system.
  pub seed: Option<u64>,
}

/// Signals for the presentation layer. Queued by every operation and drained with
/// [Session::take_events].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
  /// A square's letter, colour, lock, grey marker or cursor highlight changed.
  CellChanged(Pos),
  /// An entry became the current one; its clue should be shown.
  EntryActivated(String),
  EntrySolved(String),
  /// Every entry matches its answer. Fires once per session.
  PuzzleCompleted(ShareView),
  /// The result of an explicit submission of the current entry.
  Submission { entry: String, correct: bool },
  /// Everything was reset; redraw from scratch.
  Restarted,
}

/// Everything an input adapter can ask of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
  Type(char),
  Backspace,
  Submit,
  /// Move the cursor within the current entry, skipping locked squares.
  Navigate(Step),
  /// Move to the next playable square on the grid and select an entry through it.
  Move(Arrow),
  /// A click or tap on a square. Repeating it on the same square flips direction.
  ActivateCell(Pos),
  /// Switch between the across and down entries through the cursor's square.
  ToggleDirection,
  NextEntry,
  PreviousEntry,
  Hint(HintKind),
  /// Fill in the whole current entry.
  RevealEntry,
  Restart,
}

/// Represents a crossword puzzle being solved: the grid, its entries and the cursor.
/// When implementing a crossword app, this will be the main structure you will use.
pub struct Session {
  document: PuzzleDocument,
  pub(crate) grid: Grid,
  pub(crate) entries: Vec<Entry>,
  /// Index of the entry the cursor is in.
  pub(crate) current: Option<usize>,
  /// The square most recently clicked, for flipping direction on a repeat click.
  pub(crate) last_activated: Option<Pos>,
  /// The direction last chosen for each clicked square.
  pub(crate) direction_prefs: HashMap<Pos, Direction>,
  pub(crate) clue_help: ClueHelp,
  pub(crate) complete: bool,
  pub(crate) rng: StdRng,
  events: Vec<Event>,
}

impl Session {
  /// Builds a session from a puzzle document and selects the first entry. This is the
  /// only way a puzzle gets into the engine, wherever the document came from.
  pub fn load(document: PuzzleDocument, options: SessionOptions) -> Result<Self> {
    let mut grid = Grid::build(&document.grid)?;
    let entries = build_entries(&mut grid, &document.entries)?;
    let rng = match options.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };

    info!(
      rows = grid.rows(),
      cols = grid.cols(),
      entries = entries.len(),
      "puzzle loaded"
    );

    let mut session = Self {
      document,
      grid,
      entries,
      current: None,
      last_activated: None,
      direction_prefs: HashMap::new(),
      clue_help: ClueHelp::default(),
      complete: false,
      rng,
      events: vec![],
    };
    session.set_active(0, None);
    Ok(session)
  }

  /// A session on the built-in placeholder puzzle.
  pub fn placeholder(options: SessionOptions) -> Self {
    match Self::load(PuzzleDocument::placeholder(), options) {
      Ok(session) => session,
      Err(e) => unreachable!("the placeholder puzzle is well formed: {}", e),
    }
  }

  /// Runs one command from an input adapter.
  pub fn apply(&mut self, command: Command) {
    match command {
      Command::Type(ch) => self.type_character(ch),
      Command::Backspace => self.backspace(),
      Command::Submit => self.submit(),
      Command::Navigate(step) => {
        self.advance(step);
      }
      Command::Move(arrow) => self.move_in_grid(arrow),
      Command::ActivateCell(pos) => self.activate_cell(pos),
      Command::ToggleDirection => self.toggle_direction(),
      Command::NextEntry => self.cycle_entry(Step::Forward),
      Command::PreviousEntry => self.cycle_entry(Step::Backward),
      Command::Hint(kind) => self.request_hint(kind),
      Command::RevealEntry => self.reveal_entry(),
      Command::Restart => self.restart(),
    }
  }

  /// Puts every square and entry back the way they were when the puzzle was loaded.
  pub fn restart(&mut self) {
    self.grid.reset();
    for entry in &mut self.entries {
      entry.reset();
    }
    self.current = None;
    self.last_activated = None;
    self.direction_prefs.clear();
    self.clue_help = ClueHelp::default();
    self.complete = false;
    self.events.clear();
    info!("puzzle restarted");
    self.emit(Event::Restarted);
    self.set_active(0, None);
  }

  /// Takes every event queued since the last call.
  pub fn take_events(&mut self) -> Vec<Event> {
    std::mem::take(&mut self.events)
  }

  pub(crate) fn emit(&mut self, event: Event) {
    debug!(?event, "event");
    self.events.push(event);
  }

  /// The document this session was loaded from.
  pub fn document(&self) -> &PuzzleDocument {
    &self.document
  }

  /// Returns a reference to the current puzzle grid.
  pub fn grid(&self) -> &Grid {
    &self.grid
  }

  pub fn entries(&self) -> &[Entry] {
    &self.entries
  }

  /// Looks up an entry by id.
  pub fn entry(&self, id: &str) -> Option<&Entry> {
    self.entries.iter().find(|e| e.id() == id)
  }

  pub(crate) fn entry_index(&self, id: &str) -> Option<usize> {
    self.entries.iter().position(|e| e.id() == id)
  }

  /// Whether the whole puzzle has been filled in correctly.
  pub fn is_complete(&self) -> bool {
    self.complete
  }

  /// Which clue-help layers are switched on for the current clue.
  pub fn clue_help(&self) -> ClueHelp {
    self.clue_help
  }
}

impl std::fmt::Debug for Session {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Session")
      .field("grid", &self.grid)
      .field("current", &self.current)
      .field("complete", &self.complete)
      .finish()
  }
}
