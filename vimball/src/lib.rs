//! Vimball archive packing and installation.
//!
//! A vimball is a plain-text container used to distribute Vim plugins. This
//! crate builds vimballs from recipe files and installs them into a vimfiles
//! tree.
//!
//! # Architecture
//!
//! - [`archive`]: the container format, gzip handling and file naming
//! - [`resolve`]: locating recipe members across several source roots
//! - [`pack`]: building vimballs from recipes
//! - [`install`]: extracting vimballs and keeping the install record
//! - [`effects`]: filesystem mutations with dry-run support
//! - [`config`]: the configuration file and resolved settings
//! - [`metadata`]: version numbers and script ids embedded in plugins
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use vimball::config::VimballConfig;
//! use vimball::pack::Packer;
//!
//! let config = VimballConfig::new("/home/me/.vim");
//! let mut packer = Packer::new(&config);
//! let outcome = packer.pack(Path::new("/home/me/.vim/vimballs/foo.recipe"))?;
//! println!("{}", outcome.target().display());
//! # Ok::<(), vimball::VimballError>(())
//! ```

pub mod archive;
pub mod batch;
pub mod config;
pub mod effects;
pub mod error;
pub mod install;
pub mod metadata;
pub mod pack;
pub mod resolve;

pub use batch::BatchReport;
pub use error::{VimballError, VimballResult};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
