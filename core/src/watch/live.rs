use std::io::{self, Write};

use crossterm::{
    cursor::MoveToPreviousLine,
    queue,
    terminal::{Clear, ClearType},
};

/// A block of terminal lines that is redrawn in place.
///
/// `begin` starts a new block below whatever was printed before; each
/// `render` erases the lines written by the previous `render` of the same
/// block and prints the new text. In plain mode nothing is erased and every
/// render is simply appended, which keeps piped output free of escape codes.
#[derive(Debug)]
pub struct LiveRender<W: Write = io::Stdout> {
    out: W,
    lines: u16,
    plain: bool,
}

impl LiveRender<io::Stdout> {
    pub fn stdout(plain: bool) -> Self {
        Self::new(io::stdout(), plain)
    }
}

impl<W: Write> LiveRender<W> {
    pub fn new(out: W, plain: bool) -> Self {
        Self {
            out,
            lines: 0,
            plain,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.plain
    }

    pub fn begin(&mut self) {
        self.lines = 0;
    }

    pub fn render(&mut self, text: &str) -> io::Result<()> {
        if !self.plain {
            for _ in 0..self.lines {
                queue!(
                    self.out,
                    MoveToPreviousLine(1),
                    Clear(ClearType::CurrentLine)
                )?;
            }
        }
        let text = text.trim_end_matches('\n');
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;

        self.lines = text.split('\n').count().try_into().unwrap_or(u16::MAX);
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
