//! Wire types shared by the backend connector and the agent.

pub mod completion;
pub mod message;
pub mod request;

pub use completion::*;
pub use message::*;
pub use request::*;
