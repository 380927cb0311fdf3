mod cd_engine;
mod hazard;

/// Geometry in the scaled integer space in which all collision queries are resolved
pub mod scaled;

#[doc(inline)]
pub use cd_engine::CDEngine;
#[doc(inline)]
pub use cd_engine::HazKey;
#[doc(inline)]
pub use hazard::Hazard;
#[doc(inline)]
pub use hazard::HazardEntity;
