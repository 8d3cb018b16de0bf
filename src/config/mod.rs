//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → EngineConfig (validated, immutable)
//!     → PolicyRegistry construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; policies cannot be reconfigured at
//!   runtime (hot-reload is out of scope)
//! - All fields have defaults so a missing file still yields a working
//!   demo setup
//! - Validation separates syntactic (serde) from semantic checks and
//!   reports every error, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{default_policies, EngineConfig, ObservabilityConfig, PolicyConfig};
pub use validation::{validate_config, ValidationError};
