//! Structural drivers
//!
//! CRUD-style data structures that keep their contents across operations.
//! Every operation follows the same pattern: mutate, set the highlight,
//! record a step, wait. Removals highlight the doomed element first, then
//! close with a `Done` step holding the structure without it. Misuse (bad index, full or empty container, missing
//! node) returns `Ok(false)` / `Ok(None)` and records nothing.
//!
//! The step log accumulates across operations until `reset()`, which clears
//! the log but keeps the stored data.

pub mod array;
pub mod binary_tree;
pub mod graph;
pub mod hash_table;
pub mod linked_list;
pub mod queue;
pub mod stack;

pub use array::ArrayDriver;
pub use binary_tree::BinaryTreeDriver;
pub use graph::GraphDriver;
pub use hash_table::HashTableDriver;
pub use linked_list::LinkedListDriver;
pub use queue::QueueDriver;
pub use stack::StackDriver;

/// Step kind shared by the structural drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Insert,
    Update,
    Delete,
    Visit,
    Compare,
    Swap,
    Found,
    NotFound,
    Push,
    Pop,
    Peek,
    Enqueue,
    Dequeue,
    Hash,
    Resize,
    Clear,
    AddNode,
    AddEdge,
    RemoveNode,
    RemoveEdge,
    TraverseEdge,
    Done,
}

impl Op {
    pub fn label(self) -> &'static str {
        match self {
            Op::Insert => "insert",
            Op::Update => "update",
            Op::Delete => "delete",
            Op::Visit => "visit",
            Op::Compare => "compare",
            Op::Swap => "swap",
            Op::Found => "found",
            Op::NotFound => "not-found",
            Op::Push => "push",
            Op::Pop => "pop",
            Op::Peek => "peek",
            Op::Enqueue => "enqueue",
            Op::Dequeue => "dequeue",
            Op::Hash => "hash",
            Op::Resize => "resize",
            Op::Clear => "clear",
            Op::AddNode => "add-node",
            Op::AddEdge => "add-edge",
            Op::RemoveNode => "remove-node",
            Op::RemoveEdge => "remove-edge",
            Op::TraverseEdge => "edge",
            Op::Done => "done",
        }
    }
}
