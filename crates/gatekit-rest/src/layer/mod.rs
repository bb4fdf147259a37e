mod cors;
mod trace;

pub use cors::{
    CorsLayer, CorsService, ALLOW_HEADERS, ALLOW_METHODS, ALLOW_ORIGIN, DEFAULT_CONTENT_TYPE,
};
pub use trace::{LogRequest, RequestLogLayer, RequestSpan};
