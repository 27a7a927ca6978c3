pub mod issue;
pub mod label;
pub mod milestone;
pub mod project;
pub mod repository;
pub mod request;

pub use issue::{Issue, User};
pub use label::Label;
pub use milestone::Milestone;
pub use project::{Project, ProjectCard, ProjectColumn};
pub use repository::Repository;
