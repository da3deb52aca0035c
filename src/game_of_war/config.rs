/// Rules options an embedder may toggle. A `Board` carries its config by
/// value; changing a flag means rebuilding the board or refreshing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RulesConfig {
    /// When off, every unit is treated as online and the communications
    /// solver is a no-op. Off by default; rules-correct play turns it on.
    pub networks_enabled: bool,

    /// Whether a relay lit only by adjacency to an online friendly unit
    /// rebroadcasts its own rays. The rules documents disagree; on is the
    /// default reading.
    pub relay_adjacency_rebroadcast: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            networks_enabled: false,
            relay_adjacency_rebroadcast: true,
        }
    }
}

impl RulesConfig {
    /// The configuration for rules-correct play.
    pub fn strict() -> Self {
        RulesConfig {
            networks_enabled: true,
            relay_adjacency_rebroadcast: true,
        }
    }
}
