//! Serialization codecs for the HTTP+JSON binding

pub mod json;
pub mod sse;

pub use json::JsonCodec;
pub use sse::SseCodec;

use crate::{
    protocol::{error::A2AError, operation::A2AOperation},
    service::response::A2AResponse,
};
use bytes::Bytes;

/// Codec trait for encoding and decoding A2A protocol messages
///
/// The client encodes operations with a codec before handing them to a
/// transport and decodes the transport's response body afterwards.
pub trait Codec: Send + Sync {
    /// Serialize an A2A operation to a request body
    ///
    /// Operations without a body encode to empty bytes.
    fn encode_request(&self, operation: &A2AOperation) -> Result<Bytes, A2AError>;

    /// Deserialize response bytes to an A2A response
    ///
    /// # Arguments
    ///
    /// * `body` - The response body bytes
    /// * `operation` - The original operation (for context)
    fn decode_response(
        &self,
        body: &[u8],
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError>;

    /// Get the content type for this codec
    fn content_type(&self) -> &str;
}
