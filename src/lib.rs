//! TCP Abilities - ability triggers, effect holders and proximity exposure
//! for TCP creatures on Bevy ECS.
//!
//! This library exposes the ability plugin and the headless scenario runner
//! for testing and reuse.

pub mod actions;
pub mod cli;
pub mod constants;
pub mod delayed;
pub mod exposure;
pub mod headless;
pub mod health;
pub mod prototypes;
pub mod tcp;

// Re-export commonly used types
pub use headless::ScenarioConfig;
pub use prototypes::TcpPrototypes;
pub use tcp::components::AbilityProfile;
pub use tcp::log::{AbilityLog, AbilityLogEventType};
pub use tcp::trigger::AbilityTrigger;
pub use tcp::TcpAbilityPlugin;
