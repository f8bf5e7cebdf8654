//! Service layer for business logic
//!
//! The HTTP API only talks to [`LookupService`]; provider adapters live in
//! [`geoip`].

pub mod geoip;
mod lookup_service;
mod query;

pub use geoip::{GeoIpLookup, GeoIpRegistry, GeoRecord, ProviderKind};
pub use lookup_service::LookupService;
pub use query::{IpLiteral, LookupQuery, QueryError};
