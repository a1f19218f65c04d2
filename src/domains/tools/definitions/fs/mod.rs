//! File system tools.
//!
//! Every path argument is resolved through `core::security`, so none of
//! these tools can reach outside the configured root.

pub mod delete;
pub mod directory;
pub mod edit;
pub mod list_dir;
pub mod permissions;
pub mod read;
pub mod rename;
pub mod tree;
pub mod write;

pub use delete::{FileDeleteParams, FileDeleteTool};
pub use directory::{DirectoryCreateParams, DirectoryCreateTool};
pub use edit::{FileEditParams, FileEditTool};
pub use list_dir::{
    DirectoryListParams, DirectoryListTool, FileListParams, FileListTool, ListFilesParams,
    ListFilesTool,
};
pub use permissions::{FilePermissionsParams, FilePermissionsTool};
pub use read::{ReadFileParams, ReadFileTool, ReadManyFilesParams, ReadManyFilesTool};
pub use rename::{FileCopyTool, FileMoveTool, FileTransferParams};
pub use tree::{DirectoryTreeParams, DirectoryTreeTool};
pub use write::{FileWriteParams, FileWriteTool, WriteFileParams, WriteFileTool};
