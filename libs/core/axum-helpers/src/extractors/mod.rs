//! Request extractors shared by the HTTP handlers.
//!
//! Both extractors reject early with the standard error envelope, so
//! handlers only ever see well-formed input.

pub mod id_path;
pub mod validated_json;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
