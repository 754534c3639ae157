//! Session engine: the lock-guarded table of in-progress games.

use crate::game::{self, GuessError, Score, Secret};
use derive_getters::Getters;
use derive_more::{Display, Error, From};
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Length of a generated session id. Eight alphanumeric characters give
/// a 62^8 space, so collisions are practically impossible at the
/// expected concurrent-session counts.
const SESSION_ID_LEN: usize = 8;

/// Errors surfaced by engine operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From)]
pub enum EngineError {
    /// Unknown or already-removed session id.
    #[display("Game not found")]
    NotFound,
    /// Guess failed shape validation.
    #[display("{_0}")]
    InvalidGuess(GuessError),
}

/// One in-progress game: a secret and how many guesses it has seen.
#[derive(Debug, Clone, Getters)]
pub struct GameSession {
    /// The code this session's guesses are scored against.
    secret: Secret,
    /// Guesses evaluated so far, valid or not.
    attempts: u32,
}

/// Owns the table of in-progress games.
///
/// Handles are cheap to clone; all clones share one table behind a
/// single coarse lock, which serializes concurrent evaluations against
/// the same session.
#[derive(Debug, Clone)]
pub struct GameEngine {
    games: Arc<Mutex<HashMap<SessionId, GameSession>>>,
}

impl GameEngine {
    /// Creates an engine with an empty session table.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating game engine");
        Self {
            games: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Starts a new game with a random secret and returns its id.
    #[instrument(skip(self))]
    pub fn new_game(&self) -> SessionId {
        let mut rng = rand::thread_rng();
        let secret = Secret::random(&mut rng);
        let id = generate_id(&mut rng);
        self.insert(id, secret)
    }

    /// Starts a new game with a caller-chosen secret and returns its id.
    #[instrument(skip(self, secret))]
    pub fn new_game_with_secret(&self, secret: Secret) -> SessionId {
        let id = generate_id(&mut rand::thread_rng());
        self.insert(id, secret)
    }

    fn insert(&self, id: SessionId, secret: Secret) -> SessionId {
        let mut games = self.games.lock().unwrap();
        games.insert(id.clone(), GameSession { secret, attempts: 0 });
        info!(session_id = %id, active = games.len(), "Started new game");
        id
    }

    /// Evaluates a guess against the session's secret.
    ///
    /// The attempt counter is incremented before the guess shape is
    /// validated, so an invalid guess still consumes an attempt. The
    /// engine never removes a session on a win; callers signal
    /// completion through [`remove_game`](Self::remove_game).
    #[instrument(skip(self))]
    pub fn check_guess(&self, id: &str, guess: &str) -> Result<Score, EngineError> {
        let mut games = self.games.lock().unwrap();
        let session = games.get_mut(id).ok_or_else(|| {
            debug!(session_id = id, "Guess against unknown session");
            EngineError::NotFound
        })?;

        session.attempts += 1;

        let digits = game::parse_guess(guess).map_err(|e| {
            warn!(session_id = id, error = %e, "Rejected malformed guess");
            e
        })?;

        let score = game::score(&session.secret, &digits);
        info!(
            session_id = id,
            a = score.a,
            b = score.b,
            attempts = session.attempts,
            is_win = score.is_win(),
            "Evaluated guess"
        );
        Ok(score)
    }

    /// Returns the number of guesses evaluated for the session.
    #[instrument(skip(self))]
    pub fn attempts(&self, id: &str) -> Result<u32, EngineError> {
        let games = self.games.lock().unwrap();
        games
            .get(id)
            .map(|session| session.attempts)
            .ok_or(EngineError::NotFound)
    }

    /// Returns a snapshot of a session, if it exists.
    #[instrument(skip(self))]
    pub fn session(&self, id: &str) -> Option<GameSession> {
        let games = self.games.lock().unwrap();
        games.get(id).cloned()
    }

    /// Removes a finished or abandoned session. Removing an id that is
    /// already gone is not an error.
    #[instrument(skip(self))]
    pub fn remove_game(&self, id: &str) {
        let mut games = self.games.lock().unwrap();
        if games.remove(id).is_some() {
            info!(session_id = id, active = games.len(), "Removed game");
        } else {
            debug!(session_id = id, "Remove for unknown session, ignoring");
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_id<R: Rng>(rng: &mut R) -> SessionId {
    rng.sample_iter(Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}
