pub mod category_ops;
pub mod note_ops;
pub mod plan_ops;
pub mod task_ops;
pub mod transfer;
