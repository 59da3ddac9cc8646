pub mod auth;
pub mod config;
pub mod error;
pub mod module;
pub mod types;

pub use auth::{AllowAll, Authenticator, Principal, api_key_from_headers};
pub use config::ServiceConfig;
pub use error::{Fault, ServiceError, json_response};
pub use module::Module;
pub use types::{FieldMap, parse_field_map};
