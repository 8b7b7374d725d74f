//! A single round of fishing: roll, resolve the catch, decide, score.
use color_eyre::eyre;
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
use tracing::debug;

use super::tables::{is_auto_keep, LookupTables};

/// Number of faces on the die.
pub const DICE_FACES: u8 = 6;

/// Everything the player needs to see before deciding whether to keep a catch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundDraw {
    /// The rolled dice value.
    pub dice: u8,
    /// The catch the dice value resolved to.
    pub catch: String,
    /// Whether the catch is kept without asking.
    pub auto_keep: bool,
    /// Points if kept.
    pub points_if_kept: i64,
    /// Points if released.
    pub points_if_released: i64,
}
impl RoundDraw {
    /// Settle this draw with the player's decision. Auto-keep catches are kept regardless.
    pub fn resolve(self, keep: bool) -> RoundResult {
        let kept = keep || self.auto_keep;
        let points = if kept {
            self.points_if_kept
        } else {
            self.points_if_released
        };
        RoundResult {
            dice: self.dice,
            catch: self.catch,
            auto_keep: self.auto_keep,
            kept,
            points,
        }
    }
}

/// The outcome of a finished round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    /// The rolled dice value.
    pub dice: u8,
    /// The catch.
    pub catch: String,
    /// Whether the decision prompt was skipped.
    pub auto_keep: bool,
    /// Whether the catch was kept.
    pub kept: bool,
    /// Points scored this round.
    pub points: i64,
}

/// Whatever asks the player to keep or release a catch.
///
/// Never consulted for auto-keep catches. Plain `FnMut(&RoundDraw) -> bool` closures implement
/// this too.
pub trait DecisionProvider {
    /// Return `true` to keep the catch in `draw`.
    fn keep(&mut self, draw: &RoundDraw) -> eyre::Result<bool>;
}
impl<F> DecisionProvider for F
where
    F: FnMut(&RoundDraw) -> bool,
{
    fn keep(&mut self, draw: &RoundDraw) -> eyre::Result<bool> {
        Ok(self(draw))
    }
}

/// Rolls the die and looks catches up in its [LookupTables].
#[derive(Debug, Clone)]
pub struct RoundEngine {
    tables: LookupTables,
    rng: ChaCha20Rng,
}
impl RoundEngine {
    /// Create a [RoundEngine] with an OS-seeded die.
    pub fn new(tables: LookupTables) -> Self {
        Self {
            tables,
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Create a [RoundEngine] whose rolls are reproducible from `seed`.
    pub fn with_seed(tables: LookupTables, seed: u64) -> Self {
        Self {
            tables,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Get the [LookupTables] of this [RoundEngine].
    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    /// Roll the die: uniform over `1..=6`.
    pub fn roll_dice(&mut self) -> u8 {
        self.rng.gen_range(1..=DICE_FACES)
    }

    /// The catch for a dice value; `"Unknown"` outside the mapping table.
    pub fn resolve_catch(&self, dice: u8) -> &str {
        self.tables.catch_for(dice)
    }

    /// The points for a catch and decision; 0 for catches missing from the info table.
    pub fn score_for(&self, catch: &str, kept: bool) -> i64 {
        self.tables.points_for(catch, kept)
    }

    /// Roll and resolve, without deciding.
    pub fn play_round(&mut self) -> RoundDraw {
        let dice = self.roll_dice();
        let catch = self.resolve_catch(dice).to_owned();
        let draw = RoundDraw {
            dice,
            auto_keep: is_auto_keep(&catch),
            points_if_kept: self.score_for(&catch, true),
            points_if_released: self.score_for(&catch, false),
            catch,
        };
        debug!(dice, catch = draw.catch.as_str(), "drew catch");
        draw
    }

    /// Play a whole round, asking `decider` unless the catch is auto-keep.
    pub fn play_round_with<D>(&mut self, decider: &mut D) -> eyre::Result<RoundResult>
    where
        D: DecisionProvider + ?Sized,
    {
        let draw = self.play_round();
        let keep = draw.auto_keep || decider.keep(&draw)?;
        Ok(draw.resolve(keep))
    }
}
