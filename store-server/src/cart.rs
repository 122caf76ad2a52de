//! Shopping cart
//!
//! The cart is a map of game id to requested quantity. It is read and
//! written through [`CartStore`]; the HTML flows use the signed session
//! cookie, where the map serializes as `{"<game id>": quantity}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared::AppError;
use shared::session::Session;

/// Session key holding the cart
pub const CART_KEY: &str = "cart";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: BTreeMap<i64, i64>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add copies of a game; a non-positive quantity counts as one
    ///
    /// The running quantity saturates at `i64::MAX` and never turns negative.
    pub fn add(&mut self, game_id: i64, quantity: i64) -> i64 {
        let quantity = if quantity <= 0 { 1 } else { quantity };
        let entry = self.items.entry(game_id).or_insert(0);
        *entry = entry.saturating_add(quantity);
        *entry
    }

    /// Drop a game from the cart, reporting whether it was there
    pub fn remove(&mut self, game_id: i64) -> bool {
        self.items.remove(&game_id).is_some()
    }

    pub fn quantity(&self, game_id: i64) -> i64 {
        self.items.get(&game_id).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn game_ids(&self) -> Vec<i64> {
        self.items.keys().copied().collect()
    }

    /// `(game_id, quantity)` pairs in game id order
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.items.iter().map(|(id, qty)| (*id, *qty))
    }

    pub fn total_quantity(&self) -> i64 {
        self.items.values().fold(0, |acc, q| acc.saturating_add(*q))
    }
}

/// Somewhere a cart can be loaded from and saved to
pub trait CartStore {
    /// Current cart; a missing or unreadable cart is empty
    fn load_cart(&self) -> Cart;

    fn save_cart(&mut self, cart: &Cart) -> Result<(), AppError>;
}

impl CartStore for Session {
    fn load_cart(&self) -> Cart {
        self.get(CART_KEY).unwrap_or_default()
    }

    fn save_cart(&mut self, cart: &Cart) -> Result<(), AppError> {
        if cart.is_empty() {
            self.remove(CART_KEY);
            Ok(())
        } else {
            self.insert(CART_KEY, cart)
        }
    }
}
