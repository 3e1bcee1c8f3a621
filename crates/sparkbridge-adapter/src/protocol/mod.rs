//! Wire format types for the vendor API
//!
//! Pure serde structs matching Spark's websocket JSON frames. They are only
//! used at the transport boundary; the rest of the crate works with
//! [`VendorMessage`](crate::types::VendorMessage) and
//! [`VendorRecord`](crate::types::VendorRecord).

pub mod spark;
