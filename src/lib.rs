//! Scoped knowledge memory for AI agents, served over MCP.
//!
//! Callers store short text facts tagged with a visibility [`Scope`] and an
//! owning project, then retrieve them by semantic similarity. Similarity
//! itself is delegated to a [`VectorStore`] and an [`Embedder`]; this crate
//! owns the retrieval protocol on top of them:
//!
//! | Scope | Visible from |
//! |-------|--------------|
//! | **global** | every project, and searches with no project |
//! | **local** | the owning project only |
//! | **private** | only the unrestricted `*` search |
//!
//! A project search fans out one nearest-neighbour query per visible
//! partition, concurrently, and merges the answers into a single list ordered
//! by distance. Session-start context skips similarity altogether and orders a
//! project's records by manual-save priority.
//!
//! # Modules
//!
//! - [`knowledge`]: the engine (store, scope resolution, fan-out search, context)
//! - [`vector`]: vector store trait plus SQLite and in-memory backends
//! - [`embedding`]: embedder trait plus the HTTP embedding client
//! - [`db`]: SQLite initialization for the SQLite backend
//! - [`config`]: configuration from TOML files and environment variables
//! - [`tools`] / [`server`]: the MCP surface
//!
//! [`Scope`]: knowledge::types::Scope
//! [`VectorStore`]: vector::VectorStore
//! [`Embedder`]: embedding::Embedder

pub mod cli;
pub mod config;
pub mod db;
pub mod embedding;
pub mod error;
pub mod knowledge;
pub mod server;
pub mod tools;
pub mod vector;
