//! `dml-config` - settings model for Deep Mob Learning: Refabricated
//!
//! A hierarchical settings tree whose sections repair their own
//! out-of-range values after load, plus loading, saving and an explicit
//! descriptor of every setting.

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
