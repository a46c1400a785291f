//! # Book Summary Storage
//!
//! booksummary keeps short text summaries in one of three storage tiers and
//! presents them as one listing. It is a library first; the bundled binary is
//! one thin client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs)                                     │
//! │  - Parses arguments, renders listings, owns stdout/stderr   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Facade (api.rs)                                        │
//! │  - Routes by tier, re-lists after every mutation            │
//! │  - Absorbs backend failures (try_* variants surface them)   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - TierBackend trait                                        │
//! │  - DirBackend (private tiers, legacy shared)                │
//! │  - SharedBackend (catalog or legacy, picked per platform)   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Paths & Platform (paths.rs, platform.rs)                   │
//! │  - Directory resolution, mount state, capability level      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tiers
//!
//! | Tier              | Backing store                                      |
//! |-------------------|----------------------------------------------------|
//! | `Internal`        | `<internal>/Book Summary/`                         |
//! | `PrivateExternal` | `<external>/Book Summary/`                         |
//! | `Shared`          | catalog collection `Documents/Book Summary`, or    |
//! |                   | `<public>/Download/Book Summary/` on old platforms |
//!
//! A record is identified by `(tier, name)`. The same name may exist in
//! several tiers.
//!
//! ## No I/O Assumptions in Core
//!
//! Everything below the CLI takes Rust values and returns Rust values. It
//! never prints and never exits. All calls block; callers that must stay
//! responsive invoke the facade from a background thread.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade
//! - [`store`]: tier backends, catalog and document-tree access
//! - [`notify`]: one-shot listing subscriptions
//! - [`model`]: `Record`, `Tier`, filename normalization
//! - [`paths`]: storage roots and directory resolution
//! - [`platform`]: capability probe and shared-strategy selection
//! - [`config`]: persisted settings
//! - [`error`]: error types

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod paths;
pub mod platform;
pub mod store;
