//! MicroStrategy Library REST API client library
//!
//! A [`Session`](session::Session) logs in with standard authentication,
//! keeps the `X-MSTR-AuthToken`, and issues metadata, search, and dataset
//! requests against a selected project.
//!
//! # Quick Start
//!
//! For convenient imports, use the prelude:
//!
//! ```
//! use mstr_api_rs::prelude::*;
//! ```
//!
//! ```no_run
//! use mstr_api_rs::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let mut session = Session::new("https://demo.example.com/MicroStrategyLibrary/api")?;
//! session.open(&Credentials::new("guest", "")).await?;
//! session.set_default_project("MicroStrategy Tutorial");
//!
//! let results = session.search(&SearchQuery::new().with_name("Revenue"), None).await?;
//! for object in &results.results {
//!     println!("{} {:?}", object.id, object.name);
//! }
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod prelude;
pub mod session;
pub mod token;
