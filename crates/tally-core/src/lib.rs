//! # tally-core
//!
//! Core types and pure logic for the Tally attendance & grade ledger engine.
//!
//! This crate provides the foundational pieces shared across all Tally crates:
//! - Entity structs for ledger domain objects (sessions, records, contributions)
//! - Modality, status, and role enums
//! - Fixed-point grade arithmetic (`GradePoints`)
//! - Persistence-agnostic repository interfaces
//! - The pure evidence resolver and its policy constants
//! - Typed history detail payloads
//! - ID prefix constants
//! - Cross-cutting error types and validation helpers
//! - CLI response types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod history_detail;
pub mod ids;
pub mod points;
pub mod repository;
pub mod resolver;
pub mod responses;
pub mod validate;
