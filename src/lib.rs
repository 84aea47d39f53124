#![crate_name = "rust_ofp_stats"]
#![crate_type = "lib"]

//! Wire codec for the OpenFlow 1.0 statistics, queue-configuration and vendor messages.
//!
//! Every record is big-endian with fixed field offsets. Variable-length bodies are lists of
//! length-prefixed items bounded by a length from outside the list, and decoding never
//! reads past that bound.

pub mod error;
pub mod ofp_header;
pub mod ofp_message;
pub mod ofp_utils;
pub mod openflow0x01;

pub use crate::error::{OfpSerializationError, Result};
pub use crate::ofp_header::OfpHeader;
pub use crate::ofp_message::OfpMessage;
pub use crate::ofp_utils::FixedString;
