//! Job search engine: HTTP transport, cancellation and timers.
mod client;
mod engine;
mod types;

pub use client::{api_url, ClientSettings, QueryClient, ReqwestQueryClient, DEFAULT_API_BASE};
pub use engine::{EngineError, EngineHandle};
pub use types::{
    EngineEvent, FailureKind, FetchError, QueryParams, RequestId, Scalar, SlotId, TimerId,
};
