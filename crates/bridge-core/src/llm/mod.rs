//! Chat backends and the streaming relay

pub mod capability;
pub mod converters;
pub mod http_capability;
pub mod messages;
pub mod prompt;
pub mod relay;
pub mod sse_decoder;

pub use capability::{
    CapabilityModel, CapabilityModelProvider, ModelLookup, RequestOptions, ResponsePart,
    ResponsePartStream, UnavailableCapabilityProvider, resolve_model,
};
pub use http_capability::HttpCapabilityProvider;
pub use messages::{ImageAttachment, MessagePart, ModelMessage, ModelRole};
pub use relay::{StreamRelay, TokenStream};
