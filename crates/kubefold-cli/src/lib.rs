//! kubefold CLI library
//!
//! Exposes the CLI main function so wrapper binaries can bundle it.

mod cli;

pub use cli::run;
