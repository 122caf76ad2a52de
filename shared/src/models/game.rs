//! Game Model

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::validation::{MAX_GENRE_LEN, MAX_NAME_LEN, validate_required_text};

/// Game entity
///
/// `total_copies` is the number of owned copies; it shrinks when copies are
/// sold at checkout. Copies on loan are never stored, see [`GameStock`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Game {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub release_year: i64,
    /// Free text, e.g. "PC, PS5, Xbox"
    pub platforms: String,
    pub developer: String,
    pub total_copies: i64,
}

/// Game joined with the number of its rentals in status RENTED
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct GameStock {
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub game: Game,
    pub active_rentals: i64,
}

impl GameStock {
    pub fn available_copies(&self) -> i64 {
        self.game.total_copies - self.active_rentals
    }
}

/// API representation: the entity plus its derived availability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameView {
    #[serde(flatten)]
    pub game: Game,
    pub available_copies: i64,
}

impl From<GameStock> for GameView {
    fn from(stock: GameStock) -> Self {
        let available_copies = stock.available_copies();
        Self {
            game: stock.game,
            available_copies,
        }
    }
}

/// Validated create/replace payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInput {
    pub title: String,
    pub genre: String,
    pub release_year: i64,
    pub platforms: String,
    pub developer: String,
    pub total_copies: i64,
}

impl GameInput {
    /// Full check for new or replaced games: text fields plus a positive copy count
    pub fn validate(&self) -> Result<(), AppError> {
        self.validate_text()?;
        if self.total_copies <= 0 {
            return Err(AppError::validation(
                "total_copies must be a positive integer",
            ));
        }
        Ok(())
    }

    /// Text fields only. A merged patch keeps a stored count of 0 for sold-out games.
    pub fn validate_text(&self) -> Result<(), AppError> {
        validate_required_text(&self.title, "title", MAX_NAME_LEN)?;
        validate_required_text(&self.genre, "genre", MAX_GENRE_LEN)?;
        validate_required_text(&self.platforms, "platforms", MAX_NAME_LEN)?;
        validate_required_text(&self.developer, "developer", MAX_NAME_LEN)?;
        Ok(())
    }
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GamePatch {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub release_year: Option<i64>,
    pub platforms: Option<String>,
    pub developer: Option<String>,
    pub total_copies: Option<i64>,
}

impl GamePatch {
    /// Merge onto an existing game, producing the full row to store
    pub fn apply(self, game: &Game) -> GameInput {
        GameInput {
            title: self.title.unwrap_or_else(|| game.title.clone()),
            genre: self.genre.unwrap_or_else(|| game.genre.clone()),
            release_year: self.release_year.unwrap_or(game.release_year),
            platforms: self.platforms.unwrap_or_else(|| game.platforms.clone()),
            developer: self.developer.unwrap_or_else(|| game.developer.clone()),
            total_copies: self.total_copies.unwrap_or(game.total_copies),
        }
    }
}
