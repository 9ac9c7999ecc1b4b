//! Domain types shared across the Inkwell backend.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod ink;
pub mod pagination;
pub mod reaction;
pub mod settings;
