//! # org-repo-search
//!
//! Search GitHub repositories across a set of organizations, with local
//! bookmarks, short aliases and a recently-opened list, served as a small
//! JSON API for a launcher front-end.
//!
//! ## Architecture
//!
//! A search runs as a short pipeline:
//!
//! ```text
//!                  ┌───────────────────────┐
//!                  │   Search text         │
//!                  └───────────┬───────────┘
//!                              │
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │  Gates                │
//!                  │  config → token check │
//!                  └───────────┬───────────┘
//!                              │
//!                              ▼
//!                  ┌───────────────────────┐      ┌──────────────┐
//!                  │  Query builder        │◀─────│ Alias store  │
//!                  │  org:… / repo:…       │      └──────────────┘
//!                  └───────────┬───────────┘
//!                              │
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │  GitHub search        │
//!                  │  sort=stars desc, 30  │
//!                  └───────────┬───────────┘
//!                              │
//!                              ▼
//!                  ┌───────────────────────┐      ┌──────────────┐
//!                  │  Ranker               │◀─────│ Bookmarks    │
//!                  │  bookmarked first     │      │ Aliases      │
//!                  │  then alias matches   │      │ Recent list  │
//!                  └───────────┬───────────┘      └──────────────┘
//!                              │
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │  Recently Opened +    │
//!                  │  ranked results       │
//!                  └───────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration: token, organizations, clone dir
//! - [`models`] - Repository records, alias entries, display states
//! - [`store`] - Key-value storage and the alias, bookmark and recent stores
//! - [`github`] - Token scope check and repository search over the REST API
//! - [`search::query`] - Organization scoping and alias query rewriting
//! - [`search::rank`] - Bookmark/alias ranking and the recent section
//! - [`git`] - Cloning into the configured directory
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state and the search pipeline

pub mod api;
pub mod config;
pub mod git;
pub mod github;
pub mod models;
pub mod search;
pub mod state;
pub mod store;
