use crate::{TermInt, Coords};
use std::{io::{self, Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, KeyEventKind, read, poll};

/// One character cell as last drawn, so a message box can be taken down again.
type Cell = (char, Color);

const BLANK: Cell = (' ', Color::Reset);

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<Cell>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let stdout = stdout();
        let screen = vec![BLANK; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None })
    }

    pub fn setup(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
    }

    /// Best effort: every step runs even if an earlier one fails.
    pub fn restore(&mut self) -> io::Result<()> {
        let raw = terminal::disable_raw_mode();
        let cursor = execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking);
        let screen = execute!(self.stdout, LeaveAlternateScreen);
        raw.and(cursor).and(screen)
    }

    pub fn read_key_blocking(&self) -> io::Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                if ev.kind != KeyEventKind::Release {
                    return Ok(ev);
                }
            }
        }
    }

    pub fn read_key_events_queue(&self) -> io::Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            if let Event::Key(ev) = read()? {
                if ev.kind != KeyEventKind::Release {
                    events.push(ev);
                }
            }
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    /// Frame a `width` x `height` box whose top-left corner is `origin`.
    pub fn draw_borders(&mut self, origin: Coords, width: TermInt, height: TermInt) -> io::Result<()> {
        let end_x = origin.0 + width - 1;
        let end_y = origin.1 + height - 1;

        for x in origin.0..=end_x {
            self.print_at((x, origin.1), '=', Color::Reset)?;
            self.print_at((x, end_y), '=', Color::Reset)?;
        }

        for y in origin.1 + 1..end_y {
            self.print_at((origin.0, y), '|', Color::Reset)?;
            self.print_at((end_x, y), '|', Color::Reset)?;
        }

        Ok(())
    }

    /// Show a box of centred lines over the middle of the area that starts
    /// at `origin` and spans `area`. Whatever it covers comes back on `hide_message`.
    pub fn show_message(&mut self, lines: &[&str], color: Color, origin: Coords, area: Coords) -> io::Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (origin.0 + area.0 / 2, origin.1 + area.1 / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ', color)?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch, color)?;
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush()
    }

    pub fn hide_message(&mut self) -> io::Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let (x, y) = (top_left.0 + x_diff, top_left.1 + y_diff);
                if let Some(&(ch, color)) = self.cell(x, y) {
                    self.print_at_no_save((x, y), ch, color)?;
                }
            }
        }

        self.flush()
    }

    /// Print `text` starting at `pos`, clipped to the terminal width.
    pub fn print_str_at(&mut self, pos: Coords, text: &str, color: Color) -> io::Result<()> {
        for (x_diff, ch) in text.chars().enumerate() {
            self.print_at((pos.0 + x_diff as TermInt, pos.1), ch, color)?;
        }
        Ok(())
    }

    pub fn print_at(&mut self, pos: Coords, ch: char, color: Color) -> io::Result<()> {
        if pos.0 >= self.width || pos.1 >= self.height {
            return Ok(());
        }
        self.screen[self.width as usize * pos.1 as usize + pos.0 as usize] = (ch, color);
        self.print_at_no_save(pos, ch, color)
    }

    pub fn clear(&mut self) -> io::Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![BLANK; self.width as usize * self.height as usize];
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn cell(&self, x: TermInt, y: TermInt) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.screen.get(self.width as usize * y as usize + x as usize)
    }

    fn print_at_no_save(&mut self, pos: Coords, ch: char, color: Color) -> io::Result<()> {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        if pos.0 >= self.width || pos.1 >= self.height {
            return Ok(());
        }
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::SetForegroundColor(color),
            style::Print(ch),
            style::ResetColor
        )
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Coords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }
}
