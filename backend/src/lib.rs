//! Records service library.
//!
//! Hexagonal layout: [`domain`] holds the entities, services, and ports;
//! [`inbound`] adapts HTTP onto the driving ports; [`outbound`] implements the
//! driven ports against PostgreSQL, Redis, and `.xlsx` decoding.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI.
pub use doc::ApiDoc;
pub use middleware::Trace;
