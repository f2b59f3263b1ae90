//! The LED color editor.
//!
//! [`Editor`] is a pure state machine over the 6×8 control grid: feed it [`EditorEvent`]s and it
//! updates the colors, the cursor and its [`SessionState`]. It knows nothing about terminals;
//! [`run_session`] drives it from any [`EventSource`], such as the interactive
//! [`terminal::TerminalEvents`] or a scripted list of events:
//!
//! ```rust
//! use lcxl3::editor::{self, Direction, Editor, EditorEvent, Scripted};
//! use lcxl3::LedColor;
//!
//! let editor = Editor::new(lcxl3::factory::template()?)?;
//! let mut events = Scripted::new([
//!     EditorEvent::AllOff,
//!     EditorEvent::Move(Direction::Down),
//!     EditorEvent::CycleColorBack,
//!     EditorEvent::PaintRow,
//!     EditorEvent::Save,
//! ]);
//!
//! let template = editor::run_session(editor, &mut events)?.saved().expect("saved");
//! assert_eq!(template.controls()[8].color, Some(LedColor::Pink));
//! assert_eq!(template.controls()[0].color, Some(LedColor::Off));
//! # Ok::<(), lcxl3::Error>(())
//! ```

pub mod batch;
pub mod terminal;

mod cursor;
pub use cursor::*;

use crate::layout::{COLS, ROWS};
use crate::util::Array2d;
use crate::{validate, LedColor, Result, Template};

/// One discrete user action
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum EditorEvent {
    Move(Direction),
    /// Step the color under the cursor forward through the palette
    CycleColor,
    /// Step the color under the cursor backward through the palette
    CycleColorBack,
    /// Give the whole cursor row the color under the cursor
    PaintRow,
    /// Give the whole cursor column the color under the cursor
    PaintColumn,
    AllOff,
    Save,
    Quit,
    /// Quit, and skip any templates still waiting to be edited
    Abort,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum SessionState {
    /// Waiting for the next event
    Idle,
    /// Finished; the edited colors are to be written
    Saving,
    /// Finished; the edit is discarded
    Cancelled,
    /// Finished; the edit is discarded and so is the rest of the batch
    Aborted,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        self != Self::Idle
    }
}

/// Editing session over the LED colors of one template
#[derive(Clone, Debug)]
pub struct Editor {
    template: Template,
    /// `None` for cells that can't be edited
    grid: Array2d<Option<LedColor>>,
    cursor: Cell,
    state: SessionState,
    unsaved: bool,
}

impl Editor {
    /// Start a session. The template is validated first; an invalid one never reaches `Idle`.
    pub fn new(template: Template) -> Result<Self> {
        validate::template(&template)?;

        let mut grid = Array2d::new(ROWS, COLS);
        for control in template.controls() {
            if control.is_selectable() {
                grid.set(control.row(), control.col(), control.color);
            }
        }

        let cursor = Cell::FIRST;
        debug_assert!(cursor.is_selectable());

        Ok(Self {
            template,
            grid,
            cursor,
            state: SessionState::Idle,
            unsaved: false,
        })
    }

    pub fn cursor(&self) -> Cell {
        self.cursor
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// The color of a cell, or `None` if the cell can't be edited
    pub fn color_at(&self, cell: Cell) -> Option<LedColor> {
        if cell.row >= ROWS || cell.col >= COLS {
            return None;
        }
        self.grid.get(cell.row, cell.col)
    }

    /// Color under the cursor
    pub fn current_color(&self) -> LedColor {
        self.color_at(self.cursor).unwrap_or_default()
    }

    /// All editable cells, row by row
    pub fn editable_cells(&self) -> impl Iterator<Item = (Cell, LedColor)> + '_ {
        self.grid
            .iter()
            .filter_map(|(row, col, color)| Some((Cell { row, col }, color?)))
    }

    fn paint(&mut self, cell: Cell, color: LedColor) {
        if let Some(current) = self.grid.get_mut(cell.row, cell.col) {
            if *current != color {
                *current = color;
                self.unsaved = true;
            }
        }
    }

    fn paint_where(&mut self, color: LedColor, filter: impl Fn(Cell) -> bool) {
        let cells: Vec<Cell> = self
            .editable_cells()
            .map(|(cell, _)| cell)
            .filter(|&cell| filter(cell))
            .collect();
        for cell in cells {
            self.paint(cell, color);
        }
    }

    /// Apply one event. Events arriving after the session finished are ignored.
    pub fn handle(&mut self, event: EditorEvent) -> SessionState {
        if self.state.is_terminal() {
            return self.state;
        }

        match event {
            EditorEvent::Move(direction) => {
                if let Some(cell) = self.cursor.step(direction) {
                    self.cursor = cell;
                }
            }
            EditorEvent::CycleColor => {
                self.paint(self.cursor, self.current_color().next());
            }
            EditorEvent::CycleColorBack => {
                self.paint(self.cursor, self.current_color().previous());
            }
            EditorEvent::PaintRow => {
                let row = self.cursor.row;
                self.paint_where(self.current_color(), |cell| cell.row == row);
            }
            EditorEvent::PaintColumn => {
                let col = self.cursor.col;
                self.paint_where(self.current_color(), |cell| cell.col == col);
            }
            EditorEvent::AllOff => self.paint_where(LedColor::Off, |_| true),
            EditorEvent::Save => self.state = SessionState::Saving,
            EditorEvent::Quit => self.state = SessionState::Cancelled,
            EditorEvent::Abort => self.state = SessionState::Aborted,
        }

        log::trace!("{:?} -> cursor {:?}, {:?}", event, self.cursor, self.state);
        self.state
    }

    /// End the session. A session that never finished counts as cancelled.
    pub fn finish(mut self) -> Result<Outcome> {
        match self.state {
            SessionState::Saving => {}
            SessionState::Aborted => return Ok(Outcome::Aborted),
            SessionState::Idle | SessionState::Cancelled => return Ok(Outcome::Cancelled),
        }

        for control in self.template.controls_mut() {
            if let Some(color) = self.grid.get(control.row(), control.col()) {
                control.color = Some(color);
            }
        }
        self.template.commit()?;
        Ok(Outcome::Saved(self.template))
    }
}

/// How an editing session ended
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Outcome {
    /// Holds the re-encoded template
    Saved(Template),
    Cancelled,
    /// Cancelled, and no further templates are to be edited
    Aborted,
}

impl Outcome {
    /// The saved template, if there is one
    pub fn saved(self) -> Option<Template> {
        match self {
            Self::Saved(template) => Some(template),
            Self::Cancelled | Self::Aborted => None,
        }
    }
}

/// Anything that can feed events to an [`Editor`]
pub trait EventSource {
    /// Wait for the next event. `editor` is the current session, for sources that show it to the
    /// user. `None` means the source ran dry.
    fn next_event(&mut self, editor: &Editor) -> Result<Option<EditorEvent>>;
}

/// A fixed sequence of events
pub struct Scripted<I> {
    events: I,
}

impl<I: Iterator<Item = EditorEvent>> Scripted<I> {
    pub fn new(events: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            events: events.into_iter(),
        }
    }
}

impl<I: Iterator<Item = EditorEvent>> EventSource for Scripted<I> {
    fn next_event(&mut self, _editor: &Editor) -> Result<Option<EditorEvent>> {
        Ok(self.events.next())
    }
}

/// Run a session until it is saved, cancelled or aborted. A source that runs dry counts as
/// cancelling.
pub fn run_session(mut editor: Editor, source: &mut impl EventSource) -> Result<Outcome> {
    while !editor.state().is_terminal() {
        match source.next_event(&editor)? {
            Some(event) => {
                editor.handle(event);
            }
            None => {
                editor.handle(EditorEvent::Quit);
            }
        }
    }

    match editor.state() {
        SessionState::Cancelled => log::info!("LED editing cancelled, nothing written"),
        SessionState::Aborted => log::info!("LED editing aborted, nothing written"),
        SessionState::Idle | SessionState::Saving => {}
    }
    editor.finish()
}
