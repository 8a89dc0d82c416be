//! Watermark Core Runtime
//!
//! Foundational primitives shared by the watermark crates:
//!
//! - **State Machines**: table-driven typed statecharts with a bounded
//!   transition log
//! - **Load Lifecycle**: the idle → loading → loaded/errored machine that
//!   drives the image watermark component
//!
//! # Example
//!
//! ```rust
//! use watermark_core::{LoadLifecycle, LoadState};
//!
//! let mut lifecycle = LoadLifecycle::new();
//! let generation = lifecycle.begin();
//! assert_eq!(lifecycle.state(), LoadState::Loading);
//!
//! lifecycle.succeed(generation);
//! assert_eq!(lifecycle.state(), LoadState::Loaded);
//! ```

pub mod fsm;
pub mod lifecycle;

pub use fsm::{StateMachine, StateMachineBuilder, Step};
pub use lifecycle::{Generation, LoadEvent, LoadLifecycle, LoadState, HISTORY_LIMIT};
