//! Spec layer: the loosely-typed JSON shapes the pipeline consumes.
//!
//! The only contract here is the parsed-requirements object returned by the
//! language model. Every field is optional and most consumers substitute a
//! documented default, so the structs lean on `#[serde(default)]` throughout.

pub mod requirements;

pub use requirements::{
    AnalogChain, Clocking, InterfaceRef, Memory, ParsedRequirements, PowerStage, PowerSystem,
    PrimaryComponents, RailRef, RailSpec, RfFrontend, StorageLogging, UserInterface,
};
