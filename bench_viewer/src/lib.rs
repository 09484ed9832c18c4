pub mod cli;
pub mod config;
pub mod data;
pub mod defaults;
pub mod extract;
pub mod fetcher;
pub mod filter;
pub mod parsers;
pub mod reporting;
pub mod retrieval;
pub mod source;

// In-memory source and report builders for unit tests
#[doc(hidden)]
#[cfg(test)]
pub mod test_helpers;
