use clap::Parser;
use crate::prelude::*;

#[derive(Clone, Debug, Parser)]
pub struct UCIServerOptions {
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Enable the communications rules from the first game.
    #[arg(short, long, default_value_t = false)]
    pub networks: bool,

    /// Let relays lit only by adjacency rebroadcast their rays.
    #[arg(short, long, default_value_t = true)]
    pub relay_adjacency_rebroadcast: bool,

    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl UCIServerOptions {
    pub fn rules_config(&self) -> RulesConfig {
        RulesConfig {
            networks_enabled: self.networks,
            relay_adjacency_rebroadcast: self.relay_adjacency_rebroadcast,
        }
    }
}
