//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL record repository using Diesel ORM
//! - **cache**: Redis record mirror using bb8-redis
//! - **workbook**: `.xlsx` decoding using calamine
//!
//! Adapters translate between domain types and infrastructure
//! representations and hold no business logic.

pub mod cache;
pub mod persistence;
pub mod workbook;
