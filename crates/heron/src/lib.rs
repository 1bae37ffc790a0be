pub mod agent;
pub mod conversation;
pub mod errors;
pub mod extract;
pub mod models;
pub mod prompt;
pub mod providers;
pub mod registry;
pub mod tools;
