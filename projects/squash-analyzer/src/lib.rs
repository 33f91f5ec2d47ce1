pub mod emit;
pub mod migration;
pub mod replay;
pub mod resolve;
