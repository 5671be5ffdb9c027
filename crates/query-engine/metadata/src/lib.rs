//! Static information about the relation the query engine reads from.

pub mod metadata;
