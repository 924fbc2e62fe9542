//! Finding a puzzle to play. Sources are tried in order and the first one that yields a
//! playable puzzle wins; if none does, the built-in placeholder is used, so the player
//! never ends up with a blank grid.

use crate::document::PuzzleDocument;
use crate::session::{Session, SessionOptions};
use crate::Result;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// The file looked for when no inline document is given.
pub const DEFAULT_PUZZLE_FILE: &str = "Clues.json";

/// Reads and parses a puzzle document from a JSON file.
pub fn read_document(path: &Path) -> Result<PuzzleDocument> {
  let text = fs::read_to_string(path)?;
  PuzzleDocument::parse(&text)
}

/// Loads a session from the inline document if there is one, else from the file at
/// `path`, else from the placeholder puzzle. Failures are logged, never returned.
pub fn load_session(inline: Option<&str>, path: &Path, options: SessionOptions) -> Session {
  if let Some(text) = inline {
    match PuzzleDocument::parse(text).and_then(|doc| Session::load(doc, options)) {
      Ok(session) => {
        info!("loaded inline puzzle");
        return session;
      }
      Err(e) => warn!(error = %e, "inline puzzle rejected"),
    }
  }

  match read_document(path).and_then(|doc| Session::load(doc, options)) {
    Ok(session) => {
      info!(path = %path.display(), "loaded puzzle file");
      return session;
    }
    Err(e) => warn!(path = %path.display(), error = %e, "puzzle file rejected"),
  }

  warn!("all puzzle sources failed, using the placeholder");
  Session::placeholder(options)
}
