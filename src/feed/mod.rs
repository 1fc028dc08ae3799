pub mod controller;

pub use controller::{FeedController, FeedSettings};
