//! Request middleware.

pub mod trace_id;
