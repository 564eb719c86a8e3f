pub mod enrollment;

pub use enrollment::{create_user_event, handle_create_user_event};
