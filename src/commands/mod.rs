// ABOUTME: Command module aggregator for the nodelink CLI.
// ABOUTME: Re-exports classify and link command handlers.

mod classify;
mod link;
mod simulation;

pub use classify::classify;
pub use link::{CreateArgs, create, delete, read, update};
