//! These models represent the objects passed around by the agent
//!
//! The internal message format is a role plus an ordered list of content
//! blocks. Tool-call requests and tool results are explicit content variants
//! rather than loosely-typed attributes, so the loop never has to probe for
//! field presence. Providers convert these structs to and from their own wire
//! formats at the boundary.
pub mod message;
pub mod role;
pub mod tool;
