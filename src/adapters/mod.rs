// Adapters layer: concrete implementations of the domain ports.

pub mod consent_storage;
pub mod document;
pub mod memory;
pub mod supabase;
