use plater::arrange::ArrangeConfig;
use serde::{Deserialize, Serialize};

use crate::io::svg_util::SvgDrawOptions;

/// Configuration of the multiply application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiplyConfig {
    /// Configuration of the arrangement engine, its `min_offset` is the default clearance between copies
    pub arrange: ArrangeConfig,
    /// Default number of copies made of every selected object
    pub count: usize,
    /// Capacity of the build plate, the maximum number of copies arranged in a single request
    pub plate_capacity: Option<usize>,
    pub svg_draw_options: SvgDrawOptions,
}

impl Default for MultiplyConfig {
    fn default() -> Self {
        Self {
            arrange: ArrangeConfig::default(),
            count: 1,
            plate_capacity: None,
            svg_draw_options: SvgDrawOptions::default(),
        }
    }
}
