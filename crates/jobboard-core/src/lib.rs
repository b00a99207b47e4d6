//! Core types and trait definitions for the job board.
//!
//! This crate is free of HTTP and database dependencies. The
//! [`manager::PostingManager`] owns the posting lifecycle rules; storage and
//! credential checks are reached through the [`store::PostingStore`] and
//! [`access::AccessVerifier`] traits.

#![allow(async_fn_in_trait)]

pub mod access;
pub mod error;
pub mod manager;
pub mod memory;
pub mod posting;
pub mod store;

pub use error::{Error, Result};
