//! The puzzle document: the JSON description a [Session](crate::Session) is loaded from.

use crate::{Direction, Result};
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct PuzzleDocument {
  pub grid: GridDef,
  #[serde(default)]
  pub entries: Vec<EntryDef>,
}

/// Grid dimensions plus the squares that are blocked out or numbered.
///
/// Coordinates are signed so that a stray negative position in a hand-edited file
/// is skipped at build time instead of rejecting the whole document.
#[derive(Debug, Clone, Deserialize)]
pub struct GridDef {
  pub rows: usize,
  pub cols: usize,
  #[serde(default)]
  pub blocks: Vec<(i64, i64)>,
  #[serde(default)]
  pub numbers: Numbers,
}

/// The numbers printed on the grid. A malformed list or item is dropped with a
/// warning; it never rejects the document.
#[derive(Debug, Clone, Default)]
pub struct Numbers {
  pub all: Vec<NumberDef>,
}

impl<'de> Deserialize<'de> for Numbers {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let items = match value.get("all") {
      Some(serde_json::Value::Array(items)) => items.clone(),
      Some(other) => {
        warn!(numbers = %other, "numbers.all is not a list, ignoring it");
        vec![]
      }
      None => vec![],
    };

    let all = items
      .into_iter()
      .filter_map(|item| match serde_json::from_value::<NumberDef>(item.clone()) {
        Ok(number) => Some(number),
        Err(e) => {
          warn!(number = %item, error = %e, "skipping malformed number");
          None
        }
      })
      .collect();
    Ok(Self { all })
  }
}

/// `[row, col, label]`
pub type NumberDef = (i64, i64, Label);

/// A clue number printed in the corner of a square. Documents use both `1` and `"1"`;
/// any other scalar is shown as its JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Label {
  Number(serde_json::Number),
  Text(String),
  Flag(bool),
}

impl Display for Label {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Label::Number(n) => write!(f, "{}", n),
      Label::Text(s) => write!(f, "{}", s),
      Label::Flag(b) => write!(f, "{}", b),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryDef {
  /// Unique identifier such as `"1A"`. The leading number picks the solved colour.
  pub id: String,
  pub direction: Direction,
  pub row: usize,
  pub col: usize,
  pub answer: String,
  #[serde(default)]
  pub clue: ClueDef,
}

/// Clue text: either a plain surface reading, or segments tagged with their role in
/// the wordplay so that a renderer can annotate them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClueDef {
  pub surface: Option<String>,
  #[serde(default)]
  pub segments: Vec<SegmentDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentDef {
  pub text: String,
  /// `"definition"`, or a wordplay role such as `"fodder"` or `"indicator"`.
  #[serde(rename = "type", default)]
  pub kind: String,
  pub category: Option<String>,
  pub tooltip: Option<String>,
}

impl PuzzleDocument {
  /// Parses a document from JSON text.
  pub fn parse(text: &str) -> Result<Self> {
    Ok(serde_json::from_str(text)?)
  }

  /// The puzzle used when no real document could be loaded.
  pub fn placeholder() -> Self {
    Self {
      grid: GridDef {
        rows: 5,
        cols: 5,
        blocks: vec![],
        numbers: Numbers::default(),
      },
      entries: vec![EntryDef {
        id: "1A".into(),
        direction: Direction::Across,
        row: 0,
        col: 0,
        answer: "HELLO".into(),
        clue: ClueDef {
          surface: Some("Wave politely (5)".into()),
          segments: vec![],
        },
      }],
    }
  }
}

impl FromStr for PuzzleDocument {
  type Err = crate::Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::parse(s)
  }
}
