//! Request data transfer objects and extraction.

pub mod listing;
pub mod payload;
pub mod validated;

pub use listing::{FilterValue, ListFields, ListParams, ListQuery, SortOrder, MAX_LIMIT};
pub use payload::{
    CategoryPatch, LoginRequest, NewCategory, NewProduct, ProductPatch, RegisterRequest,
};
pub use validated::{build_candidate, ValidatedJson};
