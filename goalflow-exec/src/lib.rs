#![forbid(unsafe_code)]

pub mod clock;
pub mod credentials;
pub mod executor;

pub use crate::clock::{Clock, SystemClock};
pub use crate::credentials::CredentialStore;
pub use crate::executor::{
    CompositeEventSink, Event, EventSink, Executor, ExecutorConfig, ExtractError, HttpClient,
    HttpError, HttpRequestParts, HttpResponseParts, NoOpEventSink, ReqwestHttpClient,
    ResolveContext, ResolveError, StdoutEventSink,
};
