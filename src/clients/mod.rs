pub mod aoc_client;

pub use aoc_client::{AocClient, RemoteClient};
