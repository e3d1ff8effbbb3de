//! UI Components
//!
//! Views over the query cache. Writes go through the mutation coordinator.

mod delete_confirm_button;
mod note_board;
mod notice_bar;
mod task_list;
mod task_row;

pub use delete_confirm_button::DeleteConfirmButton;
pub use note_board::NoteBoard;
pub use notice_bar::NoticeBar;
pub use task_list::TaskList;
pub use task_row::TaskRow;
