//! Message bus.
//!
//! The update function consumes one [`Msg`] at a time and returns
//! [`Command`]s. The [`Executor`] turns deferred commands into worker threads
//! that each send one completion [`Msg`] back over an mpsc channel.

pub mod command;
pub mod executor;
pub mod message;

pub use command::Command;
pub use executor::{perform, Executor};
pub use message::{Generation, Msg};
