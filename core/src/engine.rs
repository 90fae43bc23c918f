use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use ndarray::Array2;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    Revealed,
    Exploded,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    Flagged,
    Unflagged,
}

/// One game session: the board, its counters, and the randomness used to
/// sprinkle mines on the first reveal.
#[derive(Clone, Debug)]
pub struct PlayEngine<S = SeededSource> {
    config: GameConfig,
    board: Array2<Cell>,
    mine_layout: Option<MineLayout>,
    flagged_count: CellCount,
    revealed_count: CellCount,
    exploded: bool,
    source: S,
}

impl PlayEngine {
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::new(config, SeededSource::new(seed))
    }
}

/// Starts the default 8x10 board with the fixed seed `0`, so every default
/// engine lays out the same minefield for the same first reveal. Use
/// [`PlayEngine::with_seed`] to vary games.
impl Default for PlayEngine {
    fn default() -> Self {
        Self::with_seed(GameConfig::default(), 0)
    }
}

impl<S: UniformSource> PlayEngine<S> {
    pub fn new(config: GameConfig, source: S) -> Self {
        let mut engine = Self {
            config,
            board: Array2::default(config.size.to_nd_index()),
            mine_layout: None,
            flagged_count: 0,
            revealed_count: 0,
            exploded: false,
            source,
        };
        engine.initialize(config);
        engine
    }

    /// Discards the current board and starts a fresh session. Mines are not
    /// placed until the first reveal.
    pub fn initialize(&mut self, config: GameConfig) {
        log::debug!(
            "New game {}x{} with {} mines",
            config.size.0,
            config.size.1,
            config.mines
        );
        self.config = config;
        self.board = Array2::default(config.size.to_nd_index());
        self.mine_layout = None;
        self.flagged_count = 0;
        self.revealed_count = 0;
        self.exploded = false;
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    /// Requested mine count before the first reveal, the placed count after.
    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn mines_placed(&self) -> bool {
        self.mine_layout.is_some()
    }

    pub fn mine_layout(&self) -> Option<&MineLayout> {
        self.mine_layout.as_ref()
    }

    pub fn mines_left(&self) -> i32 {
        self.status().mines_left()
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.board.get(coords.to_nd_index()).copied()
    }

    pub fn glyph_at(&self, coords: Coord2) -> Option<Glyph> {
        self.cell_at(coords)
            .map(|cell| Glyph::for_cell(cell, self.exploded))
    }

    pub fn status(&self) -> GameStatus {
        GameStatus::new(
            self.config.size,
            self.config.mines,
            self.flagged_count,
            self.revealed_count,
            self.exploded,
        )
    }

    pub fn state(&self) -> EngineState {
        self.status().state()
    }

    /// One string per row, one glyph per column.
    pub fn rendering(&self) -> Vec<String> {
        self.board
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .map(|&cell| Glyph::for_cell(cell, self.exploded).as_char())
                    .collect()
            })
            .collect()
    }

    /// Uncovers a cell, returning whether the move was accepted.
    pub fn reveal(&mut self, coords: Coord2) -> bool {
        self.try_reveal(coords).is_ok()
    }

    pub fn try_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;

        if self.mine_layout.is_none() {
            self.sprinkle_mines(coords);
        }

        if !self.board[coords.to_nd_index()].visibility.is_hidden() {
            return Err(GameError::NotHidden);
        }

        self.flood_reveal(coords);

        if self.board[coords.to_nd_index()].is_mine {
            log::debug!("Mine hit at {:?}", coords);
            self.exploded = true;
            return Ok(RevealOutcome::Exploded);
        }

        if self.state() == EngineState::Won {
            log::debug!("All safe cells revealed");
        }
        Ok(RevealOutcome::Revealed)
    }

    /// Toggles the flag on a cell, returning whether the move was accepted.
    pub fn mark(&mut self, coords: Coord2) -> bool {
        self.try_mark(coords).is_ok()
    }

    pub fn try_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        let cell = &mut self.board[coords.to_nd_index()];

        match cell.visibility {
            Visibility::Revealed => Err(GameError::AlreadyRevealed),
            Visibility::Hidden => {
                cell.visibility = Visibility::Flagged;
                self.flagged_count += 1;
                Ok(MarkOutcome::Flagged)
            }
            Visibility::Flagged => {
                cell.visibility = Visibility::Hidden;
                self.flagged_count -= 1;
                Ok(MarkOutcome::Unflagged)
            }
        }
    }

    fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.config.size) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Places mines away from `origin`, fills in adjacency counts and drops
    /// any flags set before the mines existed.
    fn sprinkle_mines(&mut self, origin: Coord2) {
        let layout = place_mines(self.config.size, origin, self.config.mines, &mut self.source);
        self.config.mines = layout.mine_count();

        for ((row, col), cell) in self.board.indexed_iter_mut() {
            let coords = (row as Coord, col as Coord);
            cell.is_mine = layout[coords];
            cell.adjacent_mines = layout.adjacent_mine_count(coords);
            if cell.visibility == Visibility::Flagged {
                cell.visibility = Visibility::Hidden;
            }
        }
        self.flagged_count = 0;

        log::debug!("Mines and counts after sprinkling:\n{}", layout);
        self.mine_layout = Some(layout);
    }

    /// Reveals `origin` and spreads through zero-count cells. Only hidden
    /// cells are ever revealed, so each cell is visited at most once.
    fn flood_reveal(&mut self, origin: Coord2) {
        let mut to_visit = vec![origin];

        while let Some(coords) = to_visit.pop() {
            let cell = &mut self.board[coords.to_nd_index()];
            if !cell.visibility.is_hidden() {
                continue;
            }

            cell.visibility = Visibility::Revealed;
            self.revealed_count += 1;
            log::trace!("Revealed {:?}, adjacent mines: {}", coords, cell.adjacent_mines);

            if cell.is_mine || cell.adjacent_mines != 0 {
                continue;
            }

            to_visit.extend(
                self.board
                    .iter_neighbors(coords)
                    .filter(|&pos| self.board[pos.to_nd_index()].visibility.is_hidden()),
            );
        }
    }
}

/// Compares game state only; the randomness source is not part of it.
impl<S> PartialEq for PlayEngine<S> {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.board == other.board
            && self.mine_layout == other.mine_layout
            && self.flagged_count == other.flagged_count
            && self.revealed_count == other.revealed_count
            && self.exploded == other.exploded
    }
}

impl<S: UniformSource> fmt::Display for PlayEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rendering().iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ops::Range;

    /// Takes the lowest index, so mines land on the first eligible sites in
    /// row-major order.
    struct FirstPick;

    impl UniformSource for FirstPick {
        fn pick(&mut self, range: Range<usize>) -> usize {
            range.start
        }
    }

    fn engine(rows: Coord, cols: Coord, mines: CellCount) -> PlayEngine<FirstPick> {
        PlayEngine::new(GameConfig::new((rows, cols), mines), FirstPick)
    }

    #[test]
    fn single_cell_board_wins_on_first_reveal() {
        let mut engine = engine(1, 1, 0);
        assert!(!engine.status().done);

        assert!(engine.reveal((0, 0)));

        let status = engine.status();
        assert_eq!(status.revealed_count, 1);
        assert!(status.done);
        assert!(!status.exploded);
    }

    #[test]
    fn small_board_cannot_hold_mines_and_floods_entirely() {
        let mut engine = engine(3, 3, 8);

        assert!(engine.reveal((1, 1)));

        let status = engine.status();
        assert_eq!(status.mine_count, 0);
        assert_eq!(status.revealed_count, 9);
        assert!(status.done);
        assert_eq!(engine.rendering(), ["000", "000", "000"]);
    }

    #[test]
    fn mark_twice_restores_hidden() {
        let mut engine = engine(4, 4, 2);

        assert!(engine.mark((0, 0)));
        assert_eq!(engine.status().flagged_count, 1);
        assert_eq!(engine.glyph_at((0, 0)), Some(Glyph::Flagged));

        assert!(engine.mark((0, 0)));
        assert_eq!(engine.status().flagged_count, 0);
        assert_eq!(engine.cell_at((0, 0)).map(|c| c.visibility), Some(Visibility::Hidden));
    }

    #[test]
    fn mark_does_not_place_mines() {
        let mut engine = engine(6, 6, 5);

        engine.mark((5, 5));

        assert!(!engine.mines_placed());
    }

    #[test]
    fn first_reveal_clears_earlier_flags() {
        let mut engine = engine(6, 6, 3);
        engine.mark((5, 5));
        engine.mark((0, 0));

        assert!(engine.reveal((0, 0)));

        assert_eq!(engine.status().flagged_count, 0);
        // the flood only passes through hidden cells, so the old flag is gone
        assert_eq!(engine.glyph_at((5, 5)), Some(Glyph::Count(0)));
        assert_eq!(engine.cell_at((0, 0)).map(|c| c.visibility), Some(Visibility::Revealed));
    }

    #[test]
    fn flagged_cell_rejects_reveal_after_placement() {
        let mut engine = engine(6, 6, 3);
        engine.reveal((0, 0));
        assert!(engine.cell_at((0, 3)).is_some_and(|cell| cell.is_mine));
        engine.mark((0, 3));

        assert_eq!(engine.try_reveal((0, 3)), Err(GameError::NotHidden));
        assert_eq!(engine.glyph_at((0, 3)), Some(Glyph::Flagged));
        assert!(!engine.status().exploded);
    }

    #[test]
    fn revealed_cell_rejects_reveal_and_mark() {
        let mut engine = engine(6, 6, 3);
        engine.reveal((0, 0));
        let before = engine.status();

        assert!(!engine.reveal((0, 0)));
        assert_eq!(engine.try_mark((0, 0)), Err(GameError::AlreadyRevealed));
        assert_eq!(engine.status(), before);
    }

    #[test]
    fn out_of_bounds_is_rejected_without_placing() {
        let mut engine = engine(4, 5, 2);

        assert_eq!(engine.try_reveal((4, 0)), Err(GameError::InvalidCoords));
        assert_eq!(engine.try_mark((0, 5)), Err(GameError::InvalidCoords));
        assert!(!engine.mines_placed());
        assert_eq!(engine.status().revealed_count, 0);
    }

    #[test]
    fn flood_stops_at_numbered_border() {
        // 1x8 from (0,0): pool is cols 3..8, one mine lands on col 3
        let mut engine = engine(1, 8, 1);

        assert_eq!(engine.try_reveal((0, 0)), Ok(RevealOutcome::Revealed));

        assert_eq!(engine.rendering(), ["001HHHHH"]);
        assert_eq!(engine.status().revealed_count, 3);
    }

    #[test]
    fn revealing_mine_explodes_and_shows_all_mines() {
        let mut engine = engine(1, 8, 2);
        engine.reveal((0, 0));

        assert_eq!(engine.try_reveal((0, 4)), Ok(RevealOutcome::Exploded));

        let status = engine.status();
        assert!(status.exploded);
        assert!(status.done);
        assert_eq!(engine.state(), EngineState::Lost);
        assert_eq!(engine.rendering(), ["001MMHHH"]);
    }

    #[test]
    fn revealing_every_safe_cell_wins() {
        let mut engine = engine(1, 5, 1);
        engine.reveal((0, 0));
        assert_eq!(engine.rendering(), ["001HH"]);

        engine.reveal((0, 4));

        assert_eq!(engine.state(), EngineState::Won);
        assert_eq!(engine.rendering(), ["001H1"]);
    }

    #[test]
    fn initialize_discards_previous_session() {
        let mut engine = engine(1, 5, 1);
        engine.reveal((0, 0));
        engine.mark((0, 3));

        engine.initialize(GameConfig::new((2, 3), 1));

        assert!(!engine.mines_placed());
        assert_eq!(engine.size(), (2, 3));
        assert_eq!(engine.rendering(), ["HHH", "HHH"]);
        assert_eq!(
            engine.status(),
            GameStatus {
                done: false,
                exploded: false,
                rows: 2,
                cols: 3,
                flagged_count: 0,
                revealed_count: 0,
                mine_count: 1,
            }
        );
    }

    #[test]
    fn display_joins_rows() {
        let engine = engine(2, 2, 0);
        assert_eq!(alloc::format!("{engine}"), "HH\nHH");
    }

    #[test]
    fn zero_count_mine_does_not_flood_neighbors() {
        // 1x12 from (0,0): the only mine lands on col 3 and has no mined neighbors
        let mut engine = engine(1, 12, 1);
        engine.reveal((0, 0));
        assert_eq!(engine.cell_at((0, 3)).map(|c| c.adjacent_mines), Some(0));

        assert_eq!(engine.try_reveal((0, 3)), Ok(RevealOutcome::Exploded));

        assert_eq!(engine.rendering(), ["001MHHHHHHHH"]);
        assert_eq!(engine.status().revealed_count, 4);
    }

    #[test]
    fn overfull_board_stays_in_progress_until_revealed() {
        let mut engine = engine(2, 2, 9);
        assert!(!engine.status().done);
        assert_eq!(engine.state(), EngineState::InProgress);

        assert!(engine.reveal((0, 0)));

        assert_eq!(engine.status().mine_count, 0);
        assert_eq!(engine.state(), EngineState::Won);
    }

    #[test]
    fn equality_ignores_source_position() {
        let config = GameConfig::new((16, 30), 99);
        let mut played = PlayEngine::with_seed(config, 5);
        played.reveal((0, 0));
        played.initialize(config);

        assert_eq!(played, PlayEngine::with_seed(config, 5));
        assert_eq!(PlayEngine::with_seed(config, 1), PlayEngine::with_seed(config, 2));

        let mut left = PlayEngine::with_seed(config, 1);
        let mut right = PlayEngine::with_seed(config, 2);
        left.reveal((8, 15));
        right.reveal((8, 15));
        assert_ne!(left, right);
    }

    #[test]
    fn default_engine_uses_fixed_seed() {
        let mut default = PlayEngine::default();
        let mut seeded = PlayEngine::with_seed(GameConfig::default(), 0);

        default.reveal((4, 5));
        seeded.reveal((4, 5));

        assert_eq!(default.mine_layout(), seeded.mine_layout());
    }
}
