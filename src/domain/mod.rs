pub mod board;
pub mod card;
pub mod column;
pub mod drag;
pub mod ids;

pub use board::Board;
pub use card::{Card, CardId};
pub use column::{Column, ColumnId};
pub use drag::{array_move, DragReconciler, DragState, DropTarget};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
