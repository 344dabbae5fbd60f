//! ESPN data-provider adapter: REST client, response models, and the
//! discrete-event extractor.

mod client;
mod extract;
pub mod types;

pub use client::{EspnClient, ProviderError};
pub use extract::events_from_summary;
