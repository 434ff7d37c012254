//! Header infrastructure: names, typed values, list containers, and the
//! list-capability registry.

pub mod header_list;
pub mod header_name;
pub mod registry;
pub mod typed_header;

pub use header_list::HeaderList;
pub use header_name::HeaderName;
pub use registry::HeaderRegistry;
pub use typed_header::TypedHeader;
