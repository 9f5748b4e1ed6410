//! InMemory Repository 実装

mod registry;

pub use registry::InMemoryParticipantRepository;
