mod directory;
#[cfg(feature = "rar")]
mod rar_archive;
mod sniff;
mod source;
mod tar_archive;
mod types;
mod zip_archive;

pub use directory::DirectorySource;
#[cfg(feature = "rar")]
pub use rar_archive::RarSource;
pub use sniff::{detect, sniff};
pub use source::*;
pub use tar_archive::TarSource;
pub use types::*;
pub use zip_archive::ZipSource;
