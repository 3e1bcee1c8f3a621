//! Vendor transport abstraction
//!
//! A [`Transport`] sends one translated conversation to the vendor and
//! yields the vendor's records in arrival order. The adapter never
//! looks behind this seam, so tests substitute scripted transports.

pub mod auth;
pub mod spark;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

use crate::error::AdapterError;
use crate::types::{VendorMessage, VendorParams, VendorRecord};

/// Records produced by one vendor call
pub type RecordStream = Pin<Box<dyn Stream<Item = Result<VendorRecord, AdapterError>> + Send>>;

/// Trait implemented by each vendor connection
#[async_trait]
pub trait Transport: Send + Sync {
    /// Human-readable transport name
    fn name(&self) -> &str;

    /// Start a vendor call and return its record stream
    ///
    /// Connection failures surface here; failures after the call started
    /// surface as an `Err` item on the stream.
    async fn get_responses(
        &self,
        messages: Vec<VendorMessage>,
        params: VendorParams,
    ) -> Result<RecordStream, AdapterError>;
}
