//! HTTP plumbing shared by the photo source and the storage target.
//!
//! # Example
//!
//! ```no_run
//! use photo_archiver_core::gateway::{ApiRequest, HttpGateway};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = HttpGateway::new("https://api.vk.com/method")?;
//! let body: serde_json::Value = gateway
//!     .send_json(ApiRequest::get("users.get").query("user_ids", 1).query("v", "5.199"))
//!     .await?;
//! println!("{body}");
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use client::{ApiRequest, CONFLICT, HttpGateway, display_url, join_url};
pub use error::ApiError;
