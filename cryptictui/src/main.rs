use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use cryptic::snapshot::{CellView, ClueBody, ClueView, Fill, ShareView};
use cryptic::{Arrow, Command, HintKind, Session, SessionOptions, Step};
use ratatui::{
  DefaultTerminal, Frame,
  buffer::Buffer,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style, Stylize},
  text::{Line, Span, Text},
  widgets::{Block, Clear, Padding, Paragraph, Widget, Wrap},
};
use ratatui_macros::{line, span};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const SQUARE_WIDTH: u16 = 7;
const SQUARE_HEIGHT: u16 = 3;

/// How long the clue panel flashes after a submission.
const CORRECT_FLASH: Duration = Duration::from_millis(650);
const WRONG_FLASH: Duration = Duration::from_millis(450);

/// Solve cryptic crosswords in your terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
  /// Puzzle document to load when no inline document is given, or it is unusable.
  #[arg(default_value = cryptic::DEFAULT_PUZZLE_FILE)]
  puzzle: PathBuf,

  /// A puzzle document as a JSON string, tried before the file.
  #[arg(long)]
  inline: Option<String>,

  /// Seed for hint selection, to make hints repeatable.
  #[arg(long)]
  seed: Option<u64>,

  /// Write logs here. Filter with RUST_LOG, e.g. RUST_LOG=cryptic=debug.
  #[arg(long)]
  log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
  let args = Args::parse();

  if let Some(path) = &args.log_file {
    init_logging(path)?;
  }

  let options = SessionOptions { seed: args.seed };
  let session = cryptic::load_session(args.inline.as_deref(), &args.puzzle, options);
  let app = App::new(session);

  let terminal = ratatui::init();
  let result = app.run(terminal);
  ratatui::restore();
  result
}

/// Logs go to a file so they don't draw over the grid.
fn init_logging(path: &Path) -> io::Result<()> {
  let file = File::create(path)?;
  tracing_subscriber::fmt()
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .with_env_filter(EnvFilter::from_default_env())
    .init();
  Ok(())
}

/// Feedback after pressing Enter, shown until `until`.
#[derive(Debug)]
struct Flash {
  correct: bool,
  until: Instant,
}

#[derive(Debug)]
pub struct App {
  session: Session,
  flash: Option<Flash>,
  /// When to move on to the next clue after a correct submission.
  advance_at: Option<Instant>,
  /// Set once the puzzle is finished, until dismissed.
  share: Option<ShareView>,
  running: bool,
}

impl App {
  fn new(session: Session) -> Self {
    Self {
      session,
      flash: None,
      advance_at: None,
      share: None,
      running: true,
    }
  }

  pub fn run(mut self, mut terminal: DefaultTerminal) -> io::Result<()> {
    self.running = true;
    while self.running {
      terminal.draw(|frame| self.draw(frame))?;
      self.handle_crossterm_events()?;
      self.tick();
    }
    Ok(())
  }

  fn draw(&self, frame: &mut Frame) {
    frame.render_widget(self, frame.area());
  }

  /// Reads the crossterm events and updates the state of [`App`]. Waits at most a short
  /// while so that flashes and the delayed move to the next clue happen on time.
  fn handle_crossterm_events(&mut self) -> io::Result<()> {
    if !event::poll(Duration::from_millis(50))? {
      return Ok(());
    }
    match event::read()? {
      // it's important to check KeyEventKind::Press to avoid handling key release events
      Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
      Event::Mouse(_) => {}
      Event::Resize(_, _) => {}
      _ => {}
    }
    Ok(())
  }

  /// Maps a key press to a [Command] for the session.
  fn on_key_event(&mut self, key: KeyEvent) {
    let command = match (key.modifiers, key.code) {
      (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => return self.quit(),
      (_, KeyCode::Esc) => {
        if self.share.take().is_none() {
          self.quit();
        }
        return;
      }
      (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(' ')) => Command::ToggleDirection,
      (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => Command::Type(c),
      (_, KeyCode::Backspace) => Command::Backspace,
      (_, KeyCode::Enter) => Command::Submit,
      (KeyModifiers::SHIFT, KeyCode::Left) => Command::Move(Arrow::Left),
      (KeyModifiers::SHIFT, KeyCode::Right) => Command::Move(Arrow::Right),
      (KeyModifiers::SHIFT, KeyCode::Up) => Command::Move(Arrow::Up),
      (KeyModifiers::SHIFT, KeyCode::Down) => Command::Move(Arrow::Down),
      (_, KeyCode::Left | KeyCode::Up) => Command::Navigate(Step::Backward),
      (_, KeyCode::Right | KeyCode::Down) => Command::Navigate(Step::Forward),
      (_, KeyCode::Tab) => Command::NextEntry,
      (_, KeyCode::BackTab) => Command::PreviousEntry,
      (_, KeyCode::F(1)) => Command::Hint(HintKind::RevealLetter),
      (_, KeyCode::F(2)) => Command::Hint(HintKind::Definition),
      (_, KeyCode::F(3)) => Command::Hint(HintKind::Wordplay),
      (_, KeyCode::F(4)) => Command::RevealEntry,
      (_, KeyCode::F(5)) => Command::Restart,
      (_, KeyCode::F(6)) => Command::Hint(HintKind::Grey),
      _ => return,
    };

    debug!(?command, "key");
    self.session.apply(command);
    self.handle_session_events();
  }

  /// Reacts to what the last command did.
  fn handle_session_events(&mut self) {
    let now = Instant::now();
    for event in self.session.take_events() {
      match event {
        cryptic::Event::Submission { correct, .. } => {
          let length = if correct { CORRECT_FLASH } else { WRONG_FLASH };
          self.flash = Some(Flash {
            correct,
            until: now + length,
          });
          self.advance_at = correct.then_some(now + CORRECT_FLASH);
        }
        cryptic::Event::PuzzleCompleted(share) => {
          info!("puzzle completed");
          self.share = Some(share);
        }
        cryptic::Event::Restarted => {
          self.flash = None;
          self.advance_at = None;
          self.share = None;
        }
        _ => {}
      }
    }
  }

  /// Expires the flash and performs the delayed move to the next clue.
  fn tick(&mut self) {
    let now = Instant::now();
    if self.flash.as_ref().is_some_and(|f| now >= f.until) {
      self.flash = None;
    }
    if self.advance_at.is_some_and(|at| now >= at) {
      self.advance_at = None;
      self.session.activate_next_entry();
      self.handle_session_events();
    }
  }

  /// Set running to false to quit the application.
  fn quit(&mut self) {
    self.running = false;
  }

  fn square_style(cell: &CellView) -> Style {
    let bg = if cell.active {
      Color::LightRed
    } else if cell.highlighted && cell.fill == Fill::White {
      Color::LightYellow
    } else {
      match cell.fill.rgb() {
        Some((r, g, b)) => Color::Rgb(r, g, b),
        None => Color::Black,
      }
    };
    let style = Style::new().bg(bg).fg(Color::Black).add_modifier(Modifier::BOLD);
    if cell.highlighted && cell.fill != Fill::White {
      style.add_modifier(Modifier::UNDERLINED)
    } else {
      style
    }
  }

  fn render_square(&self, cell: &CellView, square_area: Rect, buf: &mut Buffer) {
    if cell.fill == Fill::Block {
      Block::new()
        .style(Style::new().bg(Color::Black))
        .render(square_area, buf);
      return;
    }

    let number = Line::from(cell.numbers.join(",")).left_aligned();
    let letter = Line::from(cell.letter.map(String::from).unwrap_or_default()).centered();
    Paragraph::new(Text::from(vec![number, letter]))
      .block(Block::new().style(Self::square_style(cell)))
      .render(square_area, buf);
  }

  fn clue_lines(clue: &ClueView) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(clue.header.clone()).bold(), Line::default()];

    match &clue.body {
      ClueBody::Surface(surface) => lines.push(Line::from(surface.clone())),
      ClueBody::Segments {
        segments,
        enumeration,
      } => {
        let mut spans: Vec<Span> = vec![];
        for segment in segments {
          let style = if segment.is_definition() && clue.help.definition {
            Style::new().underlined().green()
          } else if !segment.is_definition() && clue.help.wordplay {
            Style::new().italic().cyan()
          } else {
            Style::new()
          };
          spans.push(Span::styled(segment.text.clone(), style));
          spans.push(Span::raw(" "));
        }
        spans.push(span!("({})", enumeration));
        lines.push(Line::from(spans));

        if clue.help.wordplay {
          lines.push(Line::default());
          for segment in segments.iter().filter(|s| !s.tooltip.is_empty()) {
            lines.push(line![
              span!(Style::new().italic(); "{}", segment.text),
              ": ",
              segment.tooltip.clone(),
            ]);
          }
        }
      }
    }
    lines
  }
}

impl Widget for &App {
  fn render(self, area: Rect, buf: &mut Buffer) {
    let [title_area, main_area, keys_area] = Layout::vertical([
      Constraint::Length(2),
      Constraint::Percentage(100),
      Constraint::Length(1),
    ])
    .areas(area);

    let title = line!["Ratatui Crossword".bold().blue(), ": ".bold(), "Cryptic".bold()].centered();
    title.render(title_area, buf);

    let [puzzle_area, clue_area] =
      Layout::horizontal([Constraint::Percentage(100), Constraint::Length(45)]).areas(main_area);

    let grid = self.session.grid_view();
    let puzzle_area = center(
      puzzle_area,
      Constraint::Length(u16::try_from(grid.cols * (2 + SQUARE_WIDTH as usize)).unwrap_or(u16::MAX)),
      Constraint::Length(u16::try_from(grid.rows * (1 + SQUARE_HEIGHT as usize)).unwrap_or(u16::MAX)),
    );

    let mut square_area = Rect {
      x: puzzle_area.x,
      y: puzzle_area.y,
      width: SQUARE_WIDTH,
      height: SQUARE_HEIGHT,
    };
    for row in grid.rows() {
      for cell in row {
        self.render_square(cell, square_area.intersection(area), buf);
        square_area.x = square_area.x.saturating_add(SQUARE_WIDTH + 2);
      }
      square_area.x = puzzle_area.x;
      square_area.y = square_area.y.saturating_add(SQUARE_HEIGHT + 1);
    }

    let border = match &self.flash {
      Some(Flash { correct: true, .. }) => Style::new().green(),
      Some(Flash { correct: false, .. }) => Style::new().red(),
      None => Style::new(),
    };
    let clue_lines = self
      .session
      .clue_view()
      .map(|clue| App::clue_lines(&clue))
      .unwrap_or_default();
    Paragraph::new(clue_lines)
      .wrap(Wrap { trim: true })
      .block(
        Block::bordered()
          .border_style(border)
          .title(Line::from("Current clue").centered())
          .padding(Padding::uniform(2)),
      )
      .render(clue_area, buf);

    Line::from(
      "Enter check · Space flip · Tab next · F1 letter · F2 definition · F3 wordplay · F4 reveal · F5 restart · F6 grey · Esc quit",
    )
    .dim()
    .centered()
    .render(keys_area, buf);

    if let Some(share) = &self.share {
      let text = share.text();
      let height = u16::try_from(text.lines().count() + 4).unwrap_or(u16::MAX);
      let popup = center(area, Constraint::Length(45), Constraint::Length(height));
      Clear.render(popup, buf);
      Paragraph::new(text)
        .centered()
        .block(
          Block::bordered()
            .title(Line::from("Solved!").centered())
            .padding(Padding::uniform(1)),
        )
        .render(popup, buf);
    }
  }
}

/// https://ratatui.rs/recipes/layout/center-a-widget/
fn center(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
  let [area] = Layout::horizontal([horizontal])
    .flex(Flex::Center)
    .areas(area);
  let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
  area
}
