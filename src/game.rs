//! Pure 1A2B game logic: secret codes, guess validation, and A/B scoring.

use derive_more::{Display, Error};
use rand::Rng;
use rand::seq::SliceRandom;
use std::str::FromStr;

/// Number of digits in a secret code and a guess.
pub const CODE_LEN: usize = 4;

/// Ways a guess can fail shape validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum GuessError {
    /// Guess is not exactly four characters.
    #[display("Guess must be exactly 4 digits")]
    WrongLength,
    /// Guess contains a non-digit character.
    #[display("Guess must contain digits only")]
    NotDigits,
    /// Guess uses the same digit twice.
    #[display("Digits must not repeat")]
    RepeatedDigit,
}

/// A secret code: four decimal digits, pairwise distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secret([u8; CODE_LEN]);

impl Secret {
    /// Draws a uniformly random secret by shuffling the ten digits and
    /// keeping the first four.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut digits: [u8; 10] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        digits.shuffle(rng);
        let mut code = [0u8; CODE_LEN];
        code.copy_from_slice(&digits[..CODE_LEN]);
        Self(code)
    }

    /// The digits of the code, in order.
    pub fn digits(&self) -> &[u8; CODE_LEN] {
        &self.0
    }
}

impl FromStr for Secret {
    type Err = GuessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_guess(s).map(Self)
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for d in self.0 {
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

/// Validates the shape of a guess: four characters, all decimal digits,
/// no repeats. Returns the digits on success.
pub fn parse_guess(guess: &str) -> Result<[u8; CODE_LEN], GuessError> {
    if guess.chars().count() != CODE_LEN {
        return Err(GuessError::WrongLength);
    }

    let mut digits = [0u8; CODE_LEN];
    for (i, c) in guess.chars().enumerate() {
        let d = c.to_digit(10).ok_or(GuessError::NotDigits)?;
        digits[i] = d as u8;
    }

    for i in 0..CODE_LEN {
        for j in (i + 1)..CODE_LEN {
            if digits[i] == digits[j] {
                return Err(GuessError::RepeatedDigit);
            }
        }
    }

    Ok(digits)
}

/// Result of scoring one guess against a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    /// Digits correct in both value and position.
    pub a: u8,
    /// Digits present in the secret but at a different position.
    pub b: u8,
}

impl Score {
    /// A guess wins when every position matches.
    pub fn is_win(&self) -> bool {
        self.a == CODE_LEN as u8
    }
}

/// Scores a validated guess against a secret.
///
/// `a` counts exact-position matches. For `b`, every guessed digit that
/// still exists in a working copy of the secret is counted and removed
/// from the copy; subtracting `a` from that total leaves the
/// wrong-position matches. Both codes are repeat-free, so the removal
/// step is never ambiguous.
pub fn score(secret: &Secret, guess: &[u8; CODE_LEN]) -> Score {
    let mut a = 0u8;
    for i in 0..CODE_LEN {
        if guess[i] == secret.0[i] {
            a += 1;
        }
    }

    let mut pool: Vec<u8> = secret.0.to_vec();
    let mut total = 0u8;
    for &g in guess {
        if let Some(pos) = pool.iter().position(|&s| s == g) {
            total += 1;
            pool.swap_remove(pos);
        }
    }

    Score { a, b: total - a }
}
