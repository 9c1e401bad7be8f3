pub mod import;
pub mod qualification;
