use crate::layout::{slot_at, COLS, ROWS};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A position on the 6×8 control grid. Row 0 is the top knob row.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    /// Where every editing session starts: the top left knob
    pub const FIRST: Self = Self { row: 0, col: 0 };

    /// Whether this cell holds a control with an editable LED
    pub fn is_selectable(self) -> bool {
        slot_at(self.row, self.col).map_or(false, |slot| slot.is_selectable())
    }

    /// Return the neighboring cell in the given direction, or `None` at the grid edge
    fn neighbor(self, direction: Direction) -> Option<Self> {
        let Self { row, col } = self;
        match direction {
            Direction::Up => row.checked_sub(1).map(|row| Self { row, col }),
            Direction::Down => (row + 1 < ROWS).then(|| Self { row: row + 1, col }),
            Direction::Left => col.checked_sub(1).map(|col| Self { row, col }),
            Direction::Right => (col + 1 < COLS).then(|| Self { row, col: col + 1 }),
        }
    }

    /// The nearest selectable cell in the given direction, skipping cells without an LED. `None`
    /// if there is none before the edge; the cursor doesn't wrap.
    pub fn step(self, direction: Direction) -> Option<Self> {
        let mut cell = self.neighbor(direction)?;
        while !cell.is_selectable() {
            cell = cell.neighbor(direction)?;
        }
        Some(cell)
    }
}
