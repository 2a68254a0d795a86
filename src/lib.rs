pub mod config;
pub mod debounce;
pub mod demo_feed;
pub mod error;
pub mod export;
pub mod filter;
pub mod model;
pub mod palette;
pub mod sort;
pub mod source;
pub mod state;
pub mod view;
