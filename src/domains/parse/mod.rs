//! Document parsing domain.
//!
//! Everything between the tool boundary and the Mataparser platform API:
//!
//! - `outcome.rs` - the normalized result model and its error codes
//! - `client.rs` - the multipart HTTP client behind the `ParserApi` trait
//! - `service.rs` - the validation pipeline that ties the two together

pub mod client;
pub mod outcome;
pub mod service;

pub use client::{ApiCallError, ApiResponse, FileUpload, MataparserClient, ParserApi};
pub use outcome::{ParseErrorCode, ParseFailure, ParseMetadata, ParseOutcome};
pub use service::ParseService;
