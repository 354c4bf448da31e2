//! Message passing between the front end and the background worker.
//!
//! Requests and responses are typed enums; the JSON wire form is tagged by
//! `type` so collector scripts can speak it directly.

pub mod background;
pub mod protocol;

pub use background::{Background, MessageBus, MessagingError};
pub use protocol::{Envelope, Feature, Request, Response};
