//! Arithmetic verification challenge
//!
//! An agent must solve a small arithmetic puzzle before its argument is
//! persisted. The challenge is stateless: the caller keeps the `answer` and
//! checks the response with [`Challenge::verify`]. The `text` is stylized
//! prose meant for the solver and carries no parseable structure.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest operand drawn by [`Challenge::generate`]
pub const OPERAND_MIN: i64 = 1;
/// Largest operand drawn by [`Challenge::generate`]
pub const OPERAND_MAX: i64 = 20;

/// Arithmetic operation used by a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Add, Operation::Subtract, Operation::Multiply];

    pub fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
        }
    }

    /// Parse from `+`, `-`, `*` (or `x`)
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "*" | "x" | "X" => Some(Self::Multiply),
            _ => None,
        }
    }

    /// Exact result, or `None` when it does not fit in an `i64`
    pub fn apply(&self, a: i64, b: i64) -> Option<i64> {
        match self {
            Self::Add => a.checked_add(b),
            Self::Subtract => a.checked_sub(b),
            Self::Multiply => a.checked_mul(b),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A challenge/response pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Prose shown to the solver
    pub text: String,
    /// Exact result formatted to two decimal places
    pub answer: String,
}

impl Challenge {
    /// Build a challenge from explicit operands. `None` if the result overflows.
    pub fn from_parts(num1: i64, num2: i64, op: Operation) -> Option<Self> {
        let answer = format_answer(op.apply(num1, num2)? as f64);
        let prose = match op {
            Operation::Add => format!(
                "a lobster guards {} pearls and finds {} more beneath the reef. how many pearls does it guard now?",
                num1, num2
            ),
            Operation::Subtract => format!(
                "a lobster carries {} shells and drops {} of them in the current. how many shells remain?",
                num1, num2
            ),
            Operation::Multiply => format!(
                "{} lobsters each raise {} claws in the debate hall. how many claws are raised in all?",
                num1, num2
            ),
        };

        Some(Self {
            text: stylize(&prose),
            answer,
        })
    }

    /// Draw random operands and an operation
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        loop {
            let num1 = rng.random_range(OPERAND_MIN..=OPERAND_MAX);
            let num2 = rng.random_range(OPERAND_MIN..=OPERAND_MAX);
            let op = Operation::ALL[rng.random_range(0..Operation::ALL.len())];
            // in-range operands never overflow, so this returns on the first draw
            if let Some(challenge) = Self::from_parts(num1, num2, op) {
                return challenge;
            }
        }
    }

    /// Check a solver's response. Any numeric spelling of the answer is accepted.
    pub fn verify(&self, response: &str) -> bool {
        match response.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => format_answer(value) == self.answer,
            _ => false,
        }
    }
}

/// Generate a challenge with the thread-local RNG
pub fn generate_challenge() -> Challenge {
    Challenge::generate(&mut rand::rng())
}

fn format_answer(value: f64) -> String {
    // normalise -0.0
    format!("{:.2}", value + 0.0)
}

/// Alternate letter case so the prose resists naive copy/paste parsing
fn stylize(prose: &str) -> String {
    prose
        .chars()
        .scan(false, |upper, c| {
            if c.is_alphabetic() {
                *upper = !*upper;
                Some(if *upper {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                })
            } else {
                Some(c)
            }
        })
        .collect()
}
