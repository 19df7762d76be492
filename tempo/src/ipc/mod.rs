//! Local control surface for tempoctl.

pub mod server;
