mod arrangement;
mod footprint;
mod work_area;

#[doc(inline)]
pub use arrangement::Arrangement;
#[doc(inline)]
pub use arrangement::ItemPlacement;
#[doc(inline)]
pub use footprint::Footprint;
#[doc(inline)]
pub use work_area::WorkArea;
