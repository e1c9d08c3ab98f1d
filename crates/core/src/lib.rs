pub mod config;
pub mod config_loader;
pub mod error;
pub mod odds;
pub mod proposition;
pub mod traits;

pub use config::{AppConfig, NormalizerConfig, ReportConfig, ScanConfig};
pub use config_loader::ConfigLoader;
pub use error::{PropError, PropResult};
pub use odds::{find_odds_token, OddsFraction, Rational};
pub use proposition::{
    CanonicalKey, Direction, LineKey, MarketKind, PlayerName, Proposition, RawRecord,
};
pub use traits::BookAdapter;
