pub mod events;
pub mod extract;
pub mod http;
pub mod request;
pub mod resolve;
mod runner;
mod types;

pub use events::{CompositeEventSink, Event, EventSink, NoOpEventSink, StdoutEventSink};
pub use extract::{extract_outputs, parse_body_json, ExtractError};
pub use http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts, ReqwestHttpClient};
pub use request::{build_request, RequestBuildResult};
pub use resolve::{resolve_string, resolve_value, ResolveContext, ResolveError};
pub use runner::Executor;
pub use types::ExecutorConfig;
