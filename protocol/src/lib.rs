//! JSON envelope around the board engine, for presentation layers that drive
//! a session through text messages instead of direct calls.

use msgame_core::{CellCount, Coord, Coord2, GameConfig, GameStatus, PlayEngine, SeededSource, UniformSource};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Coordinates and sizes arrive as plain integers so that negative or oversized
/// values are rejected by the engine rules rather than by the decoder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Starts a new game. `rows` and `cols` below 1 are raised to 1 and a
    /// negative `mines` becomes 0. Boards wider or taller than 255 cells, or
    /// with more than 65535 mines, are refused and the current game is kept.
    Initialize { rows: i64, cols: i64, mines: i64 },
    Reveal { row: i64, col: i64 },
    Mark { row: i64, col: i64 },
    Rendering,
    Status,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    Ack { accepted: bool },
    Rendering { rows: Vec<String> },
    Status(GameStatus),
}

fn to_coords(row: i64, col: i64) -> Option<Coord2> {
    Some((Coord::try_from(row).ok()?, Coord::try_from(col).ok()?))
}

fn to_config(rows: i64, cols: i64, mines: i64) -> Option<GameConfig> {
    let axis = |value: i64| Coord::try_from(value.max(1)).ok();
    let mines = CellCount::try_from(mines.max(0)).ok()?;
    Some(GameConfig::new((axis(rows)?, axis(cols)?), mines))
}

/// A single game session answering [`Request`]s.
#[derive(Clone, Debug)]
pub struct Session<S = SeededSource> {
    engine: PlayEngine<S>,
}

impl Session {
    pub fn with_seed(seed: u64) -> Self {
        Self::new(PlayEngine::with_seed(GameConfig::default(), seed))
    }
}

/// Same fixed seed as [`PlayEngine::default`].
impl Default for Session {
    fn default() -> Self {
        Self::new(PlayEngine::default())
    }
}

impl<S: UniformSource> Session<S> {
    pub fn new(engine: PlayEngine<S>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &PlayEngine<S> {
        &self.engine
    }

    pub fn handle(&mut self, request: Request) -> Response {
        log::trace!("Handling {:?}", request);
        match request {
            Request::Initialize { rows, cols, mines } => match to_config(rows, cols, mines) {
                Some(config) => {
                    self.engine.initialize(config);
                    Response::Ack { accepted: true }
                }
                None => {
                    log::debug!("Refused board {}x{} with {} mines", rows, cols, mines);
                    Response::Ack { accepted: false }
                }
            },
            Request::Reveal { row, col } => Response::Ack {
                accepted: to_coords(row, col).is_some_and(|coords| self.engine.reveal(coords)),
            },
            Request::Mark { row, col } => Response::Ack {
                accepted: to_coords(row, col).is_some_and(|coords| self.engine.mark(coords)),
            },
            Request::Rendering => Response::Rendering {
                rows: self.engine.rendering(),
            },
            Request::Status => Response::Status(self.engine.status()),
        }
    }

    pub fn handle_json(&mut self, message: &str) -> Result<String> {
        let request: Request = serde_json::from_str(message)?;
        let response = self.handle(request);
        Ok(serde_json::to_string(&response)?)
    }
}
