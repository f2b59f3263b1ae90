//! Interactive front end for the [`Editor`](super::Editor), drawn with ratatui on a crossterm
//! backend.

use std::io::{self, Stdout};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction as Axis, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell as TableCell, Paragraph, Row, Table};
use ratatui::{Frame, Terminal};

use super::{Cell, Direction, Editor, EditorEvent, EventSource, Outcome};
use crate::layout::{row_role, Role, COLS, ROWS};
use crate::{Error, LedColor, Result, Template};

const HELP: &str = "arrows/hjkl move · space/tab cycle · shift+tab back · r row · o column · \
                    x all off · s/enter save · q/esc quit · ctrl+c quit all";

/// Translate a key press into an editor event. Keys without a binding give `None`.
pub fn key_event(key: KeyEvent) -> Option<EditorEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(EditorEvent::Abort),
            _ => None,
        };
    }

    let event = match key.code {
        KeyCode::Up | KeyCode::Char('k') => EditorEvent::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => EditorEvent::Move(Direction::Down),
        KeyCode::Left | KeyCode::Char('h') => EditorEvent::Move(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') => EditorEvent::Move(Direction::Right),
        KeyCode::Char(' ') | KeyCode::Tab | KeyCode::Char('c') => EditorEvent::CycleColor,
        KeyCode::BackTab => EditorEvent::CycleColorBack,
        KeyCode::Char('r') => EditorEvent::PaintRow,
        KeyCode::Char('o') => EditorEvent::PaintColumn,
        KeyCode::Char('x') => EditorEvent::AllOff,
        KeyCode::Char('s') | KeyCode::Enter => EditorEvent::Save,
        KeyCode::Char('q') | KeyCode::Esc => EditorEvent::Quit,
        _ => return None,
    };
    Some(event)
}

fn swatch(color: LedColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

fn row_label(row: usize) -> &'static str {
    match row_role(row) {
        Role::Knob => "knobs",
        Role::Slider => "faders",
        Role::Button => "buttons",
    }
}

fn draw(frame: &mut Frame, editor: &Editor) {
    let chunks = Layout::default()
        .direction(Axis::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(ROWS as u16 * 2 + 2),
            Constraint::Min(0),
        ])
        .split(frame.area());

    let template = editor.template();
    let cursor = editor.cursor();
    let mut title = vec![
        Span::raw(format!("Template {:02} | ", template.number())),
        Span::styled(template.name(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            " | cursor {},{} ({})",
            cursor.row + 1,
            cursor.col + 1,
            editor.current_color()
        )),
    ];
    if editor.has_unsaved_changes() {
        title.push(Span::styled(" | modified", Style::default().fg(Color::Yellow)));
    }
    frame.render_widget(
        Block::default().borders(Borders::ALL).title(Line::from(title)),
        chunks[0],
    );

    let rows = (0..ROWS).map(|row| {
        let mut cells = vec![TableCell::from(row_label(row))];
        cells.extend((0..COLS).map(|col| {
            let cell = Cell { row, col };
            match editor.color_at(cell) {
                Some(color) => {
                    let mut style = Style::default().bg(swatch(color)).fg(Color::Black);
                    if cell == cursor {
                        style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                    }
                    TableCell::from(format!(" {} ", color.abbreviation())).style(style)
                }
                None => TableCell::from("  ║  ").style(Style::default().fg(Color::DarkGray)),
            }
        }));
        Row::new(cells).height(2)
    });
    let widths = std::iter::once(Constraint::Length(8))
        .chain(std::iter::repeat(Constraint::Length(5)).take(COLS));
    let grid = Table::new(rows, widths)
        .column_spacing(1)
        .block(Block::default().borders(Borders::ALL).title("LEDs"));
    frame.render_widget(grid, chunks[1]);

    frame.render_widget(Paragraph::new(HELP), chunks[2]);
}

/// Keyboard events from the controlling terminal.
///
/// Creating one switches the terminal to raw mode and the alternate screen; dropping it restores
/// the terminal, including when the session ends with an error.
pub struct TerminalEvents {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalEvents {
    pub fn open() -> Result<Self> {
        enable_raw_mode().map_err(Error::Terminal)?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(Error::Terminal(e));
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                restore(&mut io::stdout());
                Err(Error::Terminal(e))
            }
        }
    }
}

fn restore(stdout: &mut Stdout) {
    if let Err(e) = disable_raw_mode() {
        log::warn!("couldn't leave raw mode: {}", e);
    }
    if let Err(e) = execute!(stdout, LeaveAlternateScreen) {
        log::warn!("couldn't leave the alternate screen: {}", e);
    }
}

impl Drop for TerminalEvents {
    fn drop(&mut self) {
        restore(&mut io::stdout());
        let _ = self.terminal.show_cursor();
    }
}

impl EventSource for TerminalEvents {
    fn next_event(&mut self, editor: &Editor) -> Result<Option<EditorEvent>> {
        loop {
            self.terminal
                .draw(|frame| draw(frame, editor))
                .map_err(Error::Terminal)?;

            match event::read().map_err(Error::Terminal)? {
                Event::Key(key) => {
                    if let Some(event) = key_event(key) {
                        return Ok(Some(event));
                    }
                }
                // Anything else, such as a resize, just redraws
                _ => {}
            }
        }
    }
}

/// Edit the LED colors of `template` interactively
pub fn edit(template: Template) -> Result<Outcome> {
    let editor = Editor::new(template)?;
    let mut events = TerminalEvents::open()?;
    super::run_session(editor, &mut events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn movement_keys() {
        assert_eq!(key_event(press(KeyCode::Up)), Some(EditorEvent::Move(Direction::Up)));
        assert_eq!(key_event(press(KeyCode::Char('j'))), Some(EditorEvent::Move(Direction::Down)));
        assert_eq!(key_event(press(KeyCode::Char('h'))), Some(EditorEvent::Move(Direction::Left)));
        assert_eq!(key_event(press(KeyCode::Right)), Some(EditorEvent::Move(Direction::Right)));
    }

    #[test]
    fn editing_keys() {
        for code in [KeyCode::Char(' '), KeyCode::Tab, KeyCode::Char('c')] {
            assert_eq!(key_event(press(code)), Some(EditorEvent::CycleColor));
        }
        assert_eq!(
            key_event(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(EditorEvent::CycleColorBack)
        );
        assert_eq!(key_event(press(KeyCode::Char('r'))), Some(EditorEvent::PaintRow));
        assert_eq!(key_event(press(KeyCode::Char('o'))), Some(EditorEvent::PaintColumn));
        assert_eq!(key_event(press(KeyCode::Char('x'))), Some(EditorEvent::AllOff));
    }

    #[test]
    fn session_keys() {
        assert_eq!(key_event(press(KeyCode::Enter)), Some(EditorEvent::Save));
        assert_eq!(key_event(press(KeyCode::Char('s'))), Some(EditorEvent::Save));
        assert_eq!(key_event(press(KeyCode::Esc)), Some(EditorEvent::Quit));
        assert_eq!(
            key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(EditorEvent::Abort)
        );
        assert_eq!(
            key_event(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn unbound_and_released_keys_are_ignored() {
        assert_eq!(key_event(press(KeyCode::Char('z'))), None);
        assert_eq!(key_event(press(KeyCode::F(1))), None);

        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Char('s'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(key_event(release), None);
    }
}
