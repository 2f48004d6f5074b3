//! # Sync Problems: classic coordination problems on semaphores
//!
//! This crate solves four textbook synchronization problems with nothing but
//! the primitives of [`sema`]: counting semaphores and lightswitches. Each
//! problem runs a fixed cast of actor threads for a configurable number of
//! cycles. Every actor reports what it is doing as one line on a shared
//! [`SerializedChannel`], which a single printer thread writes to stdout.
//!
//! ## Getting Started
//!
//! Run a problem by its number:
//!
//! ```bash
//! $ cargo run -p sync-problems -- 3
//! ```
//!
//! and the test suite from the `problems/grader` directory:
//!
//! ```bash
//! $ cargo run
//! ```
//!
//! ## Problems
//!
//! | # | Problem                                    | Protocol                            |
//! |---|--------------------------------------------|-------------------------------------|
//! | 1 | Readers/writers, writers never starve      | [`NoStarve`]                        |
//! | 2 | Readers/writers, writers go first          | [`WriterPriority`]                  |
//! | 3 | Dining philosophers, `N - 1` seats         | [`TableLimit`]                      |
//! | 4 | Dining philosophers, asymmetric fork order | [`Asymmetric`]                      |
//!
//! ## Crate Structure
//!
//! - [`readers_writers`]: the [`ReadersWriters`] protocols and their actors.
//! - [`dining_philosophers`]: the [`Table`] protocols and their actors.
//! - [`scenario`]: the [`Problem`] numbering, the per-run [`Stage`] shared by
//!   all actors, and [`scenario::run`].
//! - [`config`]: actor counts, cycles and pauses.
//! - [`cli`]: command line parsing.
//! - [`error`]: everything that can end a run.
//!
//! [`SerializedChannel`]: sema::SerializedChannel
//! [`NoStarve`]: readers_writers::NoStarve
//! [`WriterPriority`]: readers_writers::WriterPriority
//! [`ReadersWriters`]: readers_writers::ReadersWriters
//! [`TableLimit`]: dining_philosophers::TableLimit
//! [`Asymmetric`]: dining_philosophers::Asymmetric
//! [`Table`]: dining_philosophers::Table
//! [`Problem`]: scenario::Problem
//! [`Stage`]: scenario::Stage

#![deny(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod cli;
pub mod config;
pub mod dining_philosophers;
pub mod error;
pub mod readers_writers;
pub mod scenario;

pub use config::{Config, Pacing};
pub use error::{Error, Result};
pub use scenario::{Problem, run};
