//! Text canvas
//!
//! The combat view draws onto a 40x25 character screen. Cells carry an
//! inverse-video flag used for highlighting (active monster, round banner).

use std::sync::Arc;

use parking_lot::Mutex;

/// Screen width in characters
pub const SCREEN_WIDTH: usize = 40;
/// Screen height in lines
pub const SCREEN_HEIGHT: usize = 25;

/// Position-addressed text output
pub trait TextCanvas: Send {
    /// Write text starting at column `x`, line `y`
    fn write_str(&mut self, x: u16, y: u16, text: &str);

    /// Write text in inverse video
    fn write_inverse(&mut self, x: u16, y: u16, text: &str);

    /// Blank lines `from..=to`
    fn clear_lines(&mut self, from: u16, to: u16);

    /// Blank the whole surface
    fn clear(&mut self);
}

/// A single screen cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub inverse: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            inverse: false,
        }
    }
}

#[derive(Debug)]
struct Grid {
    cells: Vec<Cell>,
    generation: u64,
}

impl Grid {
    fn new() -> Self {
        Self {
            cells: vec![Cell::default(); SCREEN_WIDTH * SCREEN_HEIGHT],
            generation: 0,
        }
    }

    fn put(&mut self, x: u16, y: u16, text: &str, inverse: bool) {
        let (x, y) = (usize::from(x), usize::from(y));
        if y >= SCREEN_HEIGHT {
            return;
        }
        for (offset, ch) in text.chars().enumerate() {
            let col = x + offset;
            if col >= SCREEN_WIDTH {
                break;
            }
            self.cells[y * SCREEN_WIDTH + col] = Cell { ch, inverse };
        }
        self.generation += 1;
    }
}

/// In-memory screen shared between the combat session and whoever presents it.
///
/// Cloning yields another handle onto the same grid.
#[derive(Debug, Clone)]
pub struct ScreenBuffer {
    grid: Arc<Mutex<Grid>>,
}

impl Default for ScreenBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenBuffer {
    /// Create a blank screen
    pub fn new() -> Self {
        Self {
            grid: Arc::new(Mutex::new(Grid::new())),
        }
    }

    /// Get a cell (blank if out of range)
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return Cell::default();
        }
        self.grid.lock().cells[y * SCREEN_WIDTH + x]
    }

    /// Text of line `y` with trailing blanks removed
    pub fn line(&self, y: usize) -> String {
        if y >= SCREEN_HEIGHT {
            return String::new();
        }
        let grid = self.grid.lock();
        let row: String = grid.cells[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
            .iter()
            .map(|c| c.ch)
            .collect();
        row.trim_end().to_string()
    }

    /// Whether any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        (0..SCREEN_HEIGHT).any(|y| self.line(y).contains(needle))
    }

    /// Whether any cell on line `y` is in inverse video
    pub fn has_inverse(&self, y: usize) -> bool {
        (0..SCREEN_WIDTH).any(|x| self.cell(x, y).inverse)
    }

    /// Whole screen as text, one line per row
    pub fn render(&self) -> String {
        (0..SCREEN_HEIGHT)
            .map(|y| self.line(y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Counter bumped on every write, used to detect changes
    pub fn generation(&self) -> u64 {
        self.grid.lock().generation
    }
}

impl TextCanvas for ScreenBuffer {
    fn write_str(&mut self, x: u16, y: u16, text: &str) {
        self.grid.lock().put(x, y, text, false);
    }

    fn write_inverse(&mut self, x: u16, y: u16, text: &str) {
        self.grid.lock().put(x, y, text, true);
    }

    fn clear_lines(&mut self, from: u16, to: u16) {
        let blank = " ".repeat(SCREEN_WIDTH);
        let mut grid = self.grid.lock();
        for y in from..=to {
            grid.put(0, y, &blank, false);
        }
    }

    fn clear(&mut self) {
        let mut grid = self.grid.lock();
        grid.cells.fill(Cell::default());
        grid.generation += 1;
    }
}
