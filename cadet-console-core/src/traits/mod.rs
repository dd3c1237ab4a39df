//! Storage layer abstraction trait definition

mod token_store;

pub use token_store::{describe_token, InMemoryTokenStore, StoredToken, TokenStore};
