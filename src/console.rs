//! Line-oriented terminal access for the menu interface.
//!
//! A [`Console`] owns the input reader and the output sink for one interactive session.
//! It is created when the session starts and dropped when it ends, flushing whatever
//! output is still buffered on the way out.

use std::fmt::Display;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

pub struct Console<R, W: Write> {
    input: R,
    output: W,
    clear_screen: bool,
}

impl Console<StdinLock<'static>, Stdout> {
    /// Console over the process's standard input and output.
    pub fn stdio(clear_screen: bool) -> Self {
        Console::new(io::stdin().lock(), io::stdout(), clear_screen)
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, clear_screen: bool) -> Self {
        Console { input, output, clear_screen }
    }

    /// Print `text` without a newline and read one line of input.
    ///
    /// The trailing line break is stripped. Running out of input yields an
    /// [`io::ErrorKind::UnexpectedEof`] error so callers can end the session.
    pub fn prompt(&mut self, text: &str) -> io::Result<String> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.output)
    }

    /// Clear the screen and home the cursor, unless running in plain mode.
    pub fn clear(&mut self) -> io::Result<()> {
        if self.clear_screen {
            execute!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        Ok(())
    }

    /// Wait for the user to press Enter.
    pub fn pause(&mut self) -> io::Result<()> {
        self.prompt("\nPress Enter to continue...")?;
        Ok(())
    }
}

impl<R, W: Write> Drop for Console<R, W> {
    fn drop(&mut self) {
        let _ = self.output.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_strips_line_endings() {
        let mut out = Vec::new();
        {
            let mut console = Console::new(Cursor::new("first\r\nsecond\n".as_bytes()), &mut out, false);
            assert_eq!(console.prompt("> ").unwrap(), "first");
            assert_eq!(console.prompt("> ").unwrap(), "second");
        }
        assert_eq!(String::from_utf8(out).unwrap(), "> > ");
    }

    #[test]
    fn test_prompt_reports_end_of_input() {
        let mut out = Vec::new();
        let mut console = Console::new(Cursor::new("".as_bytes()), &mut out, false);
        let err = console.prompt("> ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_plain_mode_never_clears() {
        let mut out = Vec::new();
        {
            let mut console = Console::new(Cursor::new("".as_bytes()), &mut out, false);
            console.clear().unwrap();
            console.line("hello").unwrap();
        }
        assert_eq!(String::from_utf8(out).unwrap(), "hello\n");
    }

    #[test]
    fn test_clear_emits_escape_sequence() {
        let mut out = Vec::new();
        {
            let mut console = Console::new(Cursor::new("".as_bytes()), &mut out, true);
            console.clear().unwrap();
        }
        assert!(out.starts_with(b"\x1b["));
    }
}
