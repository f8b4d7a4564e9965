//! Local bet checks, run before anything is sent to the server.

use serde::{Deserialize, Serialize};

use super::{errors::BetError, models::Chips};

/// Default bet unit.
pub const DEFAULT_BET_UNIT: Chips = 10;

/// Default bet ceiling for the strict variant.
pub const DEFAULT_MAX_BET: Chips = 1000;

/// Bet format accepted by the client.
///
/// Bets must be positive multiples of `unit`. With `max` set (the strict
/// variant) they must also not exceed it; without it (the lenient variant)
/// there is no upper bound. The server re-validates either way.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BetRules {
    pub unit: Chips,
    pub max: Option<Chips>,
}

impl Default for BetRules {
    fn default() -> Self {
        Self::strict()
    }
}

impl BetRules {
    #[must_use]
    pub const fn new(unit: Chips, max: Option<Chips>) -> Self {
        Self { unit, max }
    }

    #[must_use]
    pub const fn strict() -> Self {
        Self::new(DEFAULT_BET_UNIT, Some(DEFAULT_MAX_BET))
    }

    #[must_use]
    pub const fn lenient() -> Self {
        Self::new(DEFAULT_BET_UNIT, None)
    }

    /// Parse and check a raw bet.
    ///
    /// # Errors
    ///
    /// Returns a [`BetError`] describing the first rule the input breaks.
    pub fn validate(&self, raw: &str) -> Result<Chips, BetError> {
        let trimmed = raw.trim();
        let amount = trimmed
            .parse::<Chips>()
            .map_err(|_| BetError::NotANumber(trimmed.to_string()))?;
        self.check(amount)?;
        Ok(amount)
    }

    /// Check an already parsed amount.
    ///
    /// # Errors
    ///
    /// Same as [`BetRules::validate`], minus the parsing failure.
    pub fn check(&self, amount: Chips) -> Result<(), BetError> {
        if amount <= 0 {
            return Err(BetError::NotPositive(amount));
        }
        if self.unit <= 0 || amount % self.unit != 0 {
            return Err(BetError::NotMultiple {
                amount,
                unit: self.unit,
            });
        }
        match self.max {
            Some(max) if amount > max => Err(BetError::AboveMaximum { amount, max }),
            _ => Ok(()),
        }
    }

    /// Text of the bet prompt.
    #[must_use]
    pub fn prompt(&self) -> String {
        match self.max {
            Some(max) => format!("Enter bet (multiple of {} and <={max}):", self.unit),
            None => format!("Enter bet (multiple of {}):", self.unit),
        }
    }

    /// Explanation shown when a bet is rejected.
    #[must_use]
    pub fn requirement(&self) -> String {
        match self.max {
            Some(max) => format!(
                "Invalid bet. Enter a positive multiple of {} no greater than {max}.",
                self.unit
            ),
            None => format!("Invalid bet. Enter a positive multiple of {}.", self.unit),
        }
    }
}
