use core::fmt;
use serde::{Deserialize, Serialize};

/// Player-visible state of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

impl Visibility {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

/// One grid position. The adjacency count is only meaningful once mines are placed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub visibility: Visibility,
    pub adjacent_mines: u8,
}

/// Symbol shown for a cell in the rendering.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Glyph {
    Hidden,
    Flagged,
    Mine,
    Count(u8),
}

impl Glyph {
    pub const HIDDEN: char = 'H';
    pub const FLAGGED: char = 'F';
    pub const MINE: char = 'M';

    pub fn as_char(self) -> char {
        match self {
            Self::Hidden => Self::HIDDEN,
            Self::Flagged => Self::FLAGGED,
            Self::Mine => Self::MINE,
            Self::Count(count) => char::from_digit(count.into(), 10).unwrap_or('?'),
        }
    }

    /// Glyph precedence: a detonated board shows every mine, otherwise the
    /// player-visible state wins and only revealed cells expose their content.
    pub const fn for_cell(cell: Cell, exploded: bool) -> Self {
        match (cell.visibility, cell.is_mine) {
            (_, true) if exploded => Self::Mine,
            (Visibility::Hidden, _) => Self::Hidden,
            (Visibility::Flagged, _) => Self::Flagged,
            (Visibility::Revealed, true) => Self::Mine,
            (Visibility::Revealed, false) => Self::Count(cell.adjacent_mines),
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        f.write_char(self.as_char())
    }
}
