//! Response caches for remote call results.
//!
//! Both caches live on the calling side of the bridge and are never
//! touched by the worker context:
//!
//! - [`ResourceCache`] - per-resource-id map of parameter digest → cached
//!   value, with hit/miss counters and coarse per-id invalidation
//! - [`MetadataCache`] - field-aware specialization that merges partial
//!   records and treats "subset of known fields" as a hit
//!
//! Cache keys come from [`digest`], a stable order-independent hash of the
//! call parameters.

mod digest;
mod metadata;
mod performance;
mod store;

pub use digest::digest;
pub use metadata::MetadataCache;
pub use performance::CachePerformance;
pub use store::ResourceCache;
