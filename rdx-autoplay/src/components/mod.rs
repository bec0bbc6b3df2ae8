//! Contains the building blocks the autoplay controller is made of.
//!
//! The interval scheduler keeps time, the suspend reducer decides when time
//! should be kept, and the listener registry records which raw events the
//! controller reacts to. The `AutoplayController` owns one of each.

pub mod binding;
pub mod interval;
pub mod suspend;
