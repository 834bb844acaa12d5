pub mod error;
pub mod generator;
pub mod messages;

pub use error::{GenerateError, Result};
pub use generator::TextGenerator;
pub use messages::{MessagesClient, MessagesSettings};
