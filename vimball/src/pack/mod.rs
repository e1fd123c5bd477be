//! Packing recipes into vimballs.

mod packer;
mod recipe;

pub use packer::{PackOutcome, Packer};
pub use recipe::Recipe;
