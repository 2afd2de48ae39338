pub mod composer;
pub mod directory;
pub mod transcript;
