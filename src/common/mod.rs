pub mod compression;
pub mod http;

pub use compression::{add_accept_encoding, is_gzip_encoded, normalize_response};
pub use http::{
    BodyReader, ClientOptions, DavRequest, DavResponse, HyperClient, HyperTransport, Transport,
    build_hyper_client,
};
