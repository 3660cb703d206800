//! Wire types shared by every resource client.

pub mod envelope;
pub mod money;
pub mod pagination;

pub use envelope::Envelope;
pub use pagination::{PageQuery, Pagination};
