//! Synchronization of asynchronous cluster operations

pub mod ports;
pub mod synchronizer;
pub mod transition;
