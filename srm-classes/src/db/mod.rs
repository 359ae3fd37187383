//! Database access for srm-classes

pub mod classes;
pub mod directory;

pub use directory::{Directory, NewStudent, NewTeacher, SqliteDirectory};
