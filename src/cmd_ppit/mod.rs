//! Subcommand modules for the `ppit` binary.

pub mod align;
pub mod features;
pub mod interface;
pub mod interologs;
pub mod orthologs;
pub mod range;
