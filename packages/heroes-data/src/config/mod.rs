//! Configuration
//!
//! Backend locations and tuning knobs for the three repositories. Every
//! section has defaults, so an empty YAML document is a valid configuration.
//!
//! ```rust,ignore
//! use heroes_data::config::HeroesConfig;
//!
//! let config = HeroesConfig::from_yaml_str("search:\n  uri: http://elastic:9200\n")?
//!     .apply_env_overrides()
//!     .validated()?;
//! ```

pub mod error;
pub mod heroes_config;
pub mod sections;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use heroes_config::HeroesConfig;
pub use sections::{DocumentsConfig, RankingConfig, SearchConfig, MAX_SUGGESTIONS};
pub use validation::Validatable;
