//! Canvas data structures

mod catalog;
mod item;
mod store;


pub use catalog::{BlockCatalog, BlockSpec};
pub use item::{CanvasItem, ItemId};
pub use store::{CanvasBlockData, CanvasSnapshot, CanvasStore};
