//! Shared utility modules used across triage components.

pub mod text;
