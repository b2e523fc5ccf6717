//! UI layer for the desktop GUI: the lookup window.

pub mod app;

pub use app::OrderLookupApp;
