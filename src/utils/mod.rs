//! Utility modules.
//!
//! - [`HttpClient`]: shared reqwest client with per-request timeouts
//!
//! ```rust,no_run
//! use hepref::utils::HttpClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let response = client.get("https://inspirehep.net/api/literature?q=Einstein:1916vd")
//!     .send()
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod http;

pub use http::HttpClient;
