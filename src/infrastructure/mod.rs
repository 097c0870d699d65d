//! Infrastructure shared by the table engine

pub mod stream_name;
