pub mod user;
pub mod event;
pub mod announcement;
pub mod registration;

pub use user::*;
pub use event::*;
pub use announcement::*;
pub use registration::*;
