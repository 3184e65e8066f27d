pub mod config;
pub mod exception;
pub mod param;
pub mod request;
pub mod response;
pub mod router;
pub mod server;

pub use config::Config;
pub use exception::Exception;
pub use param::{CRLF, HTTP_VERSION, SERVER_NAME};
pub use request::Request;
pub use response::{HeaderMap, Response};
pub use router::{Handler, Router};
pub use server::Server;
