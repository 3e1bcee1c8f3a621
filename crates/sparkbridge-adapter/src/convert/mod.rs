//! Conversion between canonical types, vendor records and Spark frames
//!
//! [`request`] maps canonical requests onto vendor messages and parameters;
//! [`spark`] maps vendor messages onto Spark request frames and Spark
//! response frames back onto vendor records.

pub mod request;
pub mod spark;
