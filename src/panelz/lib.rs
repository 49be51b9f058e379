//! # Panelz Architecture
//!
//! Panelz is a **local-first interview management library**: candidates,
//! interviewers, interviews and panel feedback kept as JSON documents on
//! disk, behind a role-gated API. The `panelz` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prompts, formats output                │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Role gate per operation (access.rs + session.rs)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Flows: scheduling, cascading deletes, dashboard, doctor  │
//! │  - Returns CmdResult, never prints                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Collection<R>: generic entity store, one key per type    │
//! │  - Storage: never-failing read/write/remove + change events │
//! │  - StorageBackend: FsBackend (production), MemBackend       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. The identity check (`identity.rs`) is the only network call
//! and sits behind the [`identity::IdentityProvider`] trait.
//!
//! ## Testing Strategy
//!
//! 1. **Stores and commands**: unit tests against `MemBackend`. Most tests
//!    live here.
//! 2. **API**: gating and dispatch.
//! 3. **CLI**: `tests/` runs the binary against a temporary data directory.
//!
//! ## Module Overview
//!
//! - [`api`]: the API facade
//! - [`commands`]: business logic per area
//! - [`store`]: storage primitive, backends and entity stores
//! - [`model`]: `Candidate`, `Interviewer`, `Interview`, `Feedback`, `User`
//! - [`validation`]: field rules enforced before every write
//! - [`session`]: the logged-in user
//! - [`access`]: which role reaches which view
//! - [`identity`]: the remote login check
//! - [`config`]: configuration management
//! - [`error`]: error types
//! - `cli`: argument parsing and printing for the binary (not part of the lib API)

pub mod access;
pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod identity;
pub mod model;
pub mod session;
pub mod store;
pub mod validation;
