mod config;
mod engine;
mod probe;

#[doc(inline)]
pub use config::ArrangeConfig;
#[doc(inline)]
pub use config::MAX_PROBE_RESOLUTION;
#[doc(inline)]
pub use config::UnplacedPolicy;
#[doc(inline)]
pub use engine::arrange;
#[doc(inline)]
pub use probe::ProbeLattice;
