#![allow(dead_code)]

pub mod game_of_war;
pub mod uci_server;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{anyhow, Context, Error};
        pub type Result<T> = anyhow::Result<T, Error>;

        pub use std::{
            collections::{BTreeSet, HashSet, HashMap},
            ops::{Add, Neg, Sub}
        };
    }
}

pub mod prelude {
    pub use super::game_of_war::prelude::*;
    pub use super::uci_server::*;
    pub use super::utils::prelude::*;
}
