mod overlay;
mod shell;
mod tree;

pub use overlay::*;
pub use shell::*;
pub use tree::*;
