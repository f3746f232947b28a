//! Headless mode for scripted ability scenarios
//!
//! This module runs TCP ability scenarios without any graphical output,
//! suitable for automated testing and quick experiments with prototypes.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- --scenario scenarios/ascension.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "creatures": [
//!     {"name": "Glarer", "trigger": "ActiveAscension", "abilities": ["TCPGlare"]}
//!   ],
//!   "bystanders": [{"name": "Dummy", "position": [1.0, 0.0, 0.0]}],
//!   "script": [
//!     {"type": "Perform", "at": 0.5, "creature": "Glarer", "action": "ToggleAscension"},
//!     {"type": "Perform", "at": 1.0, "creature": "Glarer", "action": "UseTargeted", "target": "Dummy"}
//!   ],
//!   "duration_secs": 5
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::ScenarioConfig;
pub use runner::{run_scenario, RunOptions, ScenarioResult};
