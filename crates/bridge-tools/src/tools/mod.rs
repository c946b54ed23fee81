//! Tool implementations organized by category

pub mod browser;
pub mod file_ops;
pub mod process;

/// Tool names as exposed to the model
pub mod names {
    pub const SEARCH_WORKSPACE: &str = "search_workspace";
    pub const READ_FILE: &str = "read_file";
    pub const CREATE_FILE: &str = "create_file";
    pub const RUN_TERMINAL: &str = "run_terminal";
    pub const BROWSER_ACTION: &str = "browser_action";
}
