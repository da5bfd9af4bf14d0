mod client;
mod errors;
mod public_paths;

pub use client::*;
pub use errors::*;
pub use public_paths::*;
