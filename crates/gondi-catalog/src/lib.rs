//! Gondi Catalog - the off-chain offer store
//!
//! Before an offer can be signed, the catalog has to compute its id, hash
//! and resolved collateral. After signing, the catalog keeps a copy so
//! borrowers can discover it.
//!
//! [`RemoteCatalog`] is the seam; [`GraphqlCatalog`] talks to the Gondi
//! GraphQL API over HTTP.

pub mod catalog;
pub mod config;
pub mod documents;
pub mod graphql;

pub use catalog::RemoteCatalog;
pub use config::CatalogConfig;
pub use graphql::GraphqlCatalog;
