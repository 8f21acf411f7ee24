//! Backend bridge: command queue types and the worker thread that talks to the simulator.

pub mod commands;
pub mod runtime;
