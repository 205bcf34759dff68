//! Process wide configuration used as the source of defaults
use std::sync::{LazyLock, RwLock};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

pub struct Configuration {
    /// A compound participating in more than this many reactions is considered common
    pub common_reaction_limit: usize,
    /// Whether skipped role/reaction pairs are reported at warn level
    pub verbose: bool,
    /// Default lower flux bound for new reactions
    pub lower_bound: f64,
    /// Default upper flux bound for new reactions
    pub upper_bound: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            common_reaction_limit: 5,
            verbose: false,
            lower_bound: -1000.,
            upper_bound: 1000.,
        }
    }
}
