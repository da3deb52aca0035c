/*
 *  An implementation of A Game of War (Le Jeu de la Guerre) in Rust.
 */

pub(crate) mod board;
pub(crate) mod config;
pub mod consts;
pub mod coords;
pub mod error;
pub mod game;
pub mod notation;
pub mod sets;

pub mod prelude {
    pub(crate) use crate::utils::prelude::*;

    pub use super::{
        board::{Board, CombatOutcome, CombatReport, MoveOutcome},
        config::RulesConfig,
        consts::*,
        coords::{self, *},
        error::{RulesError, RulesResult},
        game::{Game, GameState, Phase, TurnAttack},
        notation::*,
        sets::*
    };

    pub use super::sets::SetOps;
}
