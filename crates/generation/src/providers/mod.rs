//! Generation backend implementations.

pub mod bedrock;

pub use bedrock::BedrockBackend;
