pub mod backlink;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod image;
pub mod macros;
pub mod markup;
pub mod render;
pub mod util;

pub use backlink::Backlink;
pub use cli::{Cli, Command};
pub use compiler::{CompiledNote, Compiler, RecompileReport};
pub use config::{Config, Layout, Overrides};
pub use engine::{Entry, NoteEngine};
pub use error::{Error, Result};
pub use image::Relocation;
pub use markup::{tokenize, ImageEmbed, Reference, Token};
pub use render::Renderer;
