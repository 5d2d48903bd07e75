//! Business services.

pub mod admin_code;
pub mod directory;
pub mod disruption;
pub mod identity;
pub mod tone;

pub use admin_code::AdminCodeService;
pub use directory::DirectoryService;
pub use disruption::{
    CreateDisruptionInput, CreatedDisruption, DisruptionDetail, DisruptionService,
    ResolveDisruptionInput,
};
pub use identity::{Actor, IdentityClaims, IdentityVerifier, JwtIdentityVerifier};
pub use tone::{MockToneAnnotator, ToneAnnotation, ToneAnnotator};
