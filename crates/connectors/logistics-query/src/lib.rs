//! An HTTP service answering filtered and aggregated queries over the daily logistics summary.

pub mod error;
pub mod routes;
pub mod state;
