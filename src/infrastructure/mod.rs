//! Infrastructure layer for filesystem and environment interactions.

pub mod paths;

pub use paths::{data_dir_with, expand_tilde, expand_tilde_with, get_data_dir, APP_DIR_NAME};
