pub mod attributes;
pub mod document;
pub mod node;

pub use attributes::Attributes;
pub use document::Document;
pub use node::{ElementData, Node, NodeData, NodeId, OtherData};
