#![doc = "Vadi address resolution API"]
pub mod audit;
pub mod cli;
pub mod commands;
pub mod config;
pub mod corner;
pub mod hierarchy;
pub mod matcher;
pub mod normalize;
pub mod parse;
pub mod resolver;
pub mod result;

#[doc(inline)]
pub use audit::{AuditEntry, AuditSink, JsonLinesAudit, MemoryAudit};

#[doc(inline)]
pub use config::ResolverConfig;

#[doc(inline)]
pub use parse::{parse, ParsedAddress, WayType};

#[doc(inline)]
pub use normalize::normalize;

#[doc(inline)]
pub use resolver::Resolver;

#[doc(inline)]
pub use result::{Outcome, Position, ResolutionPayload, ResolutionResult, ResolvedInput, Status};

pub use geostore;
