//! Simulated I/O devices and the interrupt requests they raise.
//!
//! Devices only *produce* requests. They never touch the scheduler queue
//! or the process; the engine collects their output each cycle and owns
//! everything downstream.
//!
//! # Module structure
//!
//! | Sub-module | Contents |
//! |---|---|
//! | [`kind`] | [`DeviceKind`], [`Priority`] |
//! | [`descriptor`] | [`DeviceDescriptor`], the reference device table |
//! | [`traits`] | [`DeviceSource`] trait, [`DeviceStats`] |
//! | [`random`] | [`RandomDevice`] (seeded Bernoulli generator) |
//! | [`scripted`] | [`ScriptedDevice`] (fixed arrival list) |
//! | [`set`] | [`DeviceSet`] (ordered collection polled by the engine) |

pub mod descriptor;
pub mod kind;
pub mod random;
pub mod scripted;
pub mod set;
pub mod traits;

pub use descriptor::DeviceDescriptor;
pub use kind::{DeviceKind, Priority};
pub use random::RandomDevice;
pub use scripted::ScriptedDevice;
pub use set::DeviceSet;
pub use traits::{DeviceSource, DeviceStats};
