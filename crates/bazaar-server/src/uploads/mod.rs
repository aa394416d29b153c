//! Uploaded image handling.

pub mod form;
pub mod store;

pub use form::{FormInput, UploadLimits, UploadedFile, IMAGE_FIELD};
pub use store::{LocalUploadStore, ReservedUpload, UploadStore};
