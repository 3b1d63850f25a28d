//! Shared utilities and common types for the EventHub backend.
//!
//! This crate provides functionality used across all other crates:
//! - Bearer token issuance and validation (JWT)
//! - Password hashing with Argon2id
//! - Check-in token signing and verification
//! - Cryptographic helpers for password-reset tokens
//! - Common validation logic

pub mod checkin;
pub mod crypto;
pub mod jwt;
pub mod password;
pub mod validation;
