pub mod headers;
pub mod http;
pub mod proxy;
