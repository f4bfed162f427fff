//! Core library for the `stepcheck` CLI.
//!
//! This crate provides the building blocks used by the binary: an HTTP
//! client with API-key and HMAC request signing, the run summary model and
//! its persistence, k6 load-test ingestion, HTML/CSV report rendering, and
//! the end-to-end suite driver. The primary user-facing interface is the
//! `stepcheck` command-line application; library APIs may evolve as the CLI
//! grows.
pub mod args;
pub mod config;
pub mod error;
pub mod http;
pub mod ingest;
pub mod report;
pub mod suite;
pub mod summary;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
