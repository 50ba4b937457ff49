//! Configuration for mediascope.
//!
//! - [load]: the [Config] struct, path resolution, default file generation and saving.
//! - [general]: the viewer record ([General]) shared with the backend.
//! - [input]: key bindings ([Keys]).

pub mod general;
pub mod input;
pub mod load;

pub use general::{
    DirectoryMode, DisplayMode, FileExtensions, General, join_extensions, next_option,
    parse_extensions,
};
pub use input::Keys;
pub use load::Config;
