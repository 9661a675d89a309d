//! musclemap - pick muscles on a body model, get a workout
//!
//! Muscle picks become an intensity vector, the vector is scaled to an
//! exercise count and sent to the resolver service, and the resolved
//! exercises are presented one at a time.

pub mod api;
pub mod classify;
pub mod config;
pub mod matrix;
pub mod muscles;
pub mod plan;
pub mod scaler;
pub mod selector;
pub mod session;
pub mod table;
pub mod tui;

pub use api::ResolverClient;
pub use config::Settings;
