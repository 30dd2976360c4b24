pub mod clone;

pub use clone::{clone_destination, clone_repo, CloneAuth};
