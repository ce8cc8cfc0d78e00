pub mod error;
pub mod movie;

use std::sync::{Arc, RwLock};

pub use error::Error;

use crate::movie::Movie;

/// Shared handle to the process-wide movie collection.
///
/// The whole dataset lives in memory; the lock is only there because the
/// server handles requests on multiple worker threads. Nothing awaits while
/// holding it.
pub type SharedMovies = Arc<RwLock<Vec<Movie>>>;

pub fn new_store(seed: Vec<Movie>) -> SharedMovies {
    Arc::new(RwLock::new(seed))
}
