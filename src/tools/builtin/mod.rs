//! Built-in tools

mod fetch_url;
mod list_files;
mod read_file;
mod write_file;

pub use fetch_url::FetchUrlTool;
pub use list_files::ListFilesTool;
pub use read_file::ReadFileTool;
pub use write_file::WriteFileTool;
