pub mod ast;
pub mod doc;
pub mod error;
pub mod loader;
pub mod render;

pub use ast::{
    Comment, CommentGroup, File, ListType, LiteralType, Node, ObjectItem, ObjectKey, ObjectList,
    ObjectType, Token, TokenKind,
};
pub use doc::{DeclKind, Doc, Input, Output};
pub use error::{DocError, Result};
pub use loader::{load_module, FileSet, HclParser, ModuleWalker};
pub use render::{render, OutputFormat, RenderOptions};
