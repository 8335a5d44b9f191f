#![warn(clippy::unwrap_used)]

pub mod client;
pub mod local;
pub mod lookup;

pub use client::{HttpImageSource, ImageFetcher, ImageSource};
pub use local::ImageStore;
pub use lookup::ImageLookup;
