use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};

use crate::board::Board;
use crate::food::FoodKind;
use crate::frontend::{Frame, Frontend, Input};

pub type TermInt = u16;
pub type TermCoords = (TermInt, TermInt);

const SNAKE_BODY_CHAR: char = '█';
const CIRCULAR_FOOD_GLYPH: [char; 2] = ['(', ')'];
const STAR_FOOD_GLYPH: [char; 2] = ['*', '*'];

const SNAKE_COLOR: Color = Color::Green;
const CIRCULAR_FOOD_COLOR: Color = Color::Yellow;
const STAR_FOOD_COLOR: Color = Color::Red;
const TEXT_COLOR: Color = Color::White;

/// Rows above the board: the HUD line and the top border
const BOARD_TOP: TermInt = 2;
const BOARD_LEFT: TermInt = 1;
/// Each board cell is two characters wide so it looks square
const CELL_WIDTH: TermInt = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell { ch: ' ', color: Color::Reset };

    pub fn new(ch: char, color: Color) -> Self {
        Cell { ch, color }
    }
}

/// Raw-mode terminal with a shadow buffer of what is on screen, so redraws
/// only touch cells that changed and overlays can be taken down again.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<Cell>,
    current_msg: Option<Message>,
    active: bool,
}

struct Message {
    top_left: TermCoords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let screen = vec![Cell::BLANK; width as usize * height as usize];
        Ok(TermManager { width, height, stdout: stdout(), screen, current_msg: None, active: false })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        self.active = true;
        terminal::enable_raw_mode().context("Error setting raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("Error hiding cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        self.active = false;
        terminal::disable_raw_mode().context("Error unsetting raw mode")?;
        execute!(self.stdout, ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Error leaving alt screen")?;
        Ok(())
    }

    /// Waits up to `timeout` for the first key, then drains whatever else is queued.
    pub fn read_key_events_queue(&self, timeout: Duration) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait)? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
            wait = Duration::ZERO;
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> TermCoords {
        (self.width, self.height)
    }

    pub fn draw_borders(&mut self, top_left: TermCoords, size: TermCoords) -> Result<()> {
        let (x0, y0) = top_left;
        let (width, height) = size;
        let end_x = x0 + width - 1;
        let end_y = y0 + height - 1;

        for x in x0..=end_x {
            let ch = if x == x0 || x == end_x {'+'} else {'-'};
            self.print_at((x, y0), Cell::new(ch, TEXT_COLOR))?;
            self.print_at((x, end_y), Cell::new(ch, TEXT_COLOR))?;
        }

        for y in y0 + 1..end_y {
            self.print_at((x0, y), Cell::new('|', TEXT_COLOR))?;
            self.print_at((end_x, y), Cell::new('|', TEXT_COLOR))?;
        }

        self.flush()
    }

    pub fn print_str_at(&mut self, pos: TermCoords, text: &str, color: Color) -> Result<()> {
        for (i, ch) in text.chars().enumerate() {
            self.print_at((pos.0 + i as TermInt, pos.1), Cell::new(ch, color))?;
        }
        Ok(())
    }

    pub fn show_message(&mut self, lines: &[String]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 4) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), Cell::BLANK)?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), Cell::new(ch, TEXT_COLOR))?;
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let (x, y) = (top_left.0 + x_diff, top_left.1 + y_diff);
                if let Some(cell) = self.index_of((x, y)).map(|i| self.screen[i]) {
                    self.print_at_no_save((x, y), cell)?;
                }
            }
        }

        self.flush()
    }

    /// Queues `cell` at `pos` unless the screen already shows it there.
    pub fn print_at(&mut self, pos: TermCoords, cell: Cell) -> Result<()> {
        let idx = match self.index_of(pos) {
            Some(idx) => idx,
            None => return Ok(()),
        };

        if self.screen[idx] != cell {
            self.print_at_no_save(pos, cell)?;
            self.screen[idx] = cell;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Error clearing")?;
        self.screen = vec![Cell::BLANK; self.width as usize * self.height as usize];
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index_of(&self, pos: TermCoords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }

    fn print_at_no_save(&mut self, pos: TermCoords, cell: Cell) -> Result<()> {
        // Used for messages, which must not overwrite the local buffer so it
        // can be restored when the message is hidden
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), SetForegroundColor(cell.color), Print(cell.ch))?;
        Ok(())
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: TermCoords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> TermCoords {
        self.top_left
    }
}

/// Smallest terminal that fits the HUD line and the bordered board
pub fn required_size(board: &Board) -> TermCoords {
    let width = board.columns() as TermInt * CELL_WIDTH + 2;
    let height = board.rows() as TermInt + BOARD_TOP + 1;
    (width, height)
}

/// Terminal position of the left half of a board cell
pub fn cell_origin(column: i32, row: i32) -> TermCoords {
    (BOARD_LEFT + column as TermInt * CELL_WIDTH, BOARD_TOP + row as TermInt)
}

/// Maps a key press to the names the game understands. Arrows and WASD
/// both steer; CTRL+C quits.
pub fn translate_key(ev: &KeyEvent) -> Option<Input> {
    if is_ctrl_c(ev) {
        return Some(Input::Quit);
    }

    let name = match ev.code {
        KeyCode::Char('w') | KeyCode::Up => "Up".to_string(),
        KeyCode::Char('a') | KeyCode::Left => "Left".to_string(),
        KeyCode::Char('s') | KeyCode::Down => "Down".to_string(),
        KeyCode::Char('d') | KeyCode::Right => "Right".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Char(c) => c.to_string(),
        _ => return None,
    };
    Some(Input::Key(name))
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

/// The game drawn in a terminal: a HUD line on top and the board in a box
/// below it.
pub struct TerminalFrontend {
    term: TermManager,
    board: Board,
}

impl TerminalFrontend {
    pub fn new(board: Board) -> Result<Self> {
        let mut term = TermManager::new()?;

        let (have_w, have_h) = term.get_terminal_size();
        let (need_w, need_h) = required_size(&board);
        if have_w < need_w || have_h < need_h {
            bail!("terminal is {}x{}, the board needs at least {}x{}", have_w, have_h, need_w, need_h);
        }

        term.setup()?;
        term.clear()?;
        term.draw_borders((0, BOARD_TOP - 1), (need_w, board.rows() as TermInt + 2))?;
        Ok(TerminalFrontend { term, board })
    }

    pub fn restore(&mut self) -> Result<()> {
        self.term.restore()
    }

    fn draw_hud(&mut self, frame: &Frame<'_>) -> Result<()> {
        let (board_w, _) = required_size(&self.board);
        let length = format!("Length: {:<6}", frame.length);
        let time = format!("{:>12}", format!("Time: {}s", frame.elapsed_seconds));

        self.term.print_str_at((1, 0), &length, TEXT_COLOR)?;
        self.term.print_str_at((board_w.saturating_sub(time.len() as TermInt + 1), 0), &time, TEXT_COLOR)
    }

    fn draw_board(&mut self, frame: &Frame<'_>) -> Result<()> {
        let (cols, rows) = (self.board.columns(), self.board.rows());
        let mut cells = vec![[Cell::BLANK; 2]; (cols * rows) as usize];

        let mut put = |pos, glyph: [char; 2], color| {
            if let Some((c, r)) = frame.board.cell_of(pos) {
                cells[(r * cols + c) as usize] = [Cell::new(glyph[0], color), Cell::new(glyph[1], color)];
            }
        };

        for item in frame.food {
            match item.kind {
                FoodKind::Circular => put(item.position, CIRCULAR_FOOD_GLYPH, CIRCULAR_FOOD_COLOR),
                FoodKind::Star => put(item.position, STAR_FOOD_GLYPH, STAR_FOOD_COLOR),
            }
        }

        // Tail first so the head is drawn last
        for pos in frame.snake.body().iter().skip(1).rev() {
            put(*pos, [SNAKE_BODY_CHAR; 2], SNAKE_COLOR);
        }
        put(frame.snake.head(), [frame.snake.head_char(); 2], SNAKE_COLOR);

        for r in 0..rows {
            for c in 0..cols {
                let (x, y) = cell_origin(c, r);
                let [left, right] = cells[(r * cols + c) as usize];
                self.term.print_at((x, y), left)?;
                self.term.print_at((x + 1, y), right)?;
            }
        }
        Ok(())
    }
}

impl Frontend for TerminalFrontend {
    fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.draw_hud(frame)?;
        self.draw_board(frame)?;

        match &frame.message {
            Some(lines) => self.term.show_message(lines)?,
            None => self.term.hide_message()?,
        }

        self.term.flush()
    }

    fn poll_input(&mut self, timeout: Duration) -> Result<Vec<Input>> {
        let events = self.term.read_key_events_queue(timeout)?;
        Ok(events.iter().filter_map(translate_key).collect())
    }
}
