//! # Recommender Crate
//!
//! Query side of the system: given a loaded `IndexArtifact`, return the
//! movies most similar to a chosen title.
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommender::{Recommender, DEFAULT_RECOMMENDATIONS};
//!
//! let recommender = Recommender::open(Path::new("data/index"))?;
//! let result = recommender.recommend("Avatar", DEFAULT_RECOMMENDATIONS);
//! for title in &result.titles {
//!     println!("{}", title);
//! }
//! ```

pub mod query;
pub mod types;

pub use query::Recommender;
pub use types::{Recommendations, ScoredMovie, DEFAULT_RECOMMENDATIONS};
