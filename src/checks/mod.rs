pub mod block_headers;
pub mod identifiers;
pub mod literals;
