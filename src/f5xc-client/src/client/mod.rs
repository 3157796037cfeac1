mod client_impl;
mod config_rustls;

pub use client_impl::F5Client;
pub use config_rustls::*;

pub mod http {
    pub use ::http::header;
    pub use ::http::status;
    pub use ::http::Error;
    pub use ::http::uri::InvalidUri;
    pub use hyper::Uri;
}

pub mod prelude {
    pub use hyper::Body;
    pub use hyper::Request;
}
