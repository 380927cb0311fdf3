mod graph;
mod node;

#[doc(inline)]
pub use graph::Scene;
#[doc(inline)]
pub use node::NodeKey;
#[doc(inline)]
pub use node::NodeKind;
#[doc(inline)]
pub use node::SceneNode;
