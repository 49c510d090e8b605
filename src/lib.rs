//! Small photo editor: an edit session with linear undo over a set of simple
//! per-pixel transforms, plus the helpers used by the command-line tools.

pub mod config;
pub mod error;
pub mod image_io;
pub mod logo;
pub mod operation;
pub mod session;
pub mod transforms;

pub use error::{EditorError, Result};
pub use operation::{AspectMode, BorderMethod, Operation, PadParams, ThresholdMode};
pub use session::{Command, EditSession};
