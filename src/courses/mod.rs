pub mod storage;
pub mod types;

pub use storage::{clear_course, course_path, load_course, save_course, storage_key};
pub use types::{restore_course, CourseSnapshot, PersistedComponent, SavedCourse};
