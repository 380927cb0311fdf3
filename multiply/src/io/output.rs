use serde::{Deserialize, Serialize};

use crate::config::MultiplyConfig;
use crate::io::ext_repr::ExtScene;

/// Everything written after a multiply run
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MultiplyOutput {
    /// The scene after the copies were added
    pub scene: ExtScene,
    /// Ids of the top nodes of the added copies
    pub added: Vec<u64>,
    /// Number of copies which could not be placed inside the work area
    pub n_unplaced: usize,
    pub config: MultiplyConfig,
}
