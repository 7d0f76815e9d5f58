pub mod align;
pub mod compare;
pub mod error;
pub mod features;
pub mod gap;
pub mod gap_pattern;
pub mod indices;
pub mod interolog;
pub mod io;
pub mod ortholog;
pub mod store;
pub mod tables;
