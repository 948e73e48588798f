//! `wms-core` — shared building blocks for the warehouse service.
//!
//! Strongly-typed identifiers and the domain error model. No IO lives here.

pub mod error;
pub mod id;
pub mod text;

pub use error::{DomainError, DomainResult};
pub use id::{HubId, SellerId, SkuId, TenantId};
pub use text::{check_len, check_opt_len};
