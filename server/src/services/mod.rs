//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own retrieval and LLM orchestration so route handlers can
//! stay focused on form decoding and status mapping.

pub mod answer;
pub mod corpus;
pub mod index;
