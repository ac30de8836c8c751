// Core modules implementing the record model, parsing, persistence, and error modeling.
pub mod error;
pub mod export;
pub mod parse;
pub mod record;
pub mod store;
