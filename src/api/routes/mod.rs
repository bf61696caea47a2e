//! API Routes
//!
//! Route handlers organized by functionality.

pub mod charts;
pub mod entries;
pub mod export;
pub mod health;
