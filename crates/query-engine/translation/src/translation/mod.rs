//! Translate an incoming filter request to an execution plan (SQL) to be run against the database.

pub mod query;
pub mod request;
