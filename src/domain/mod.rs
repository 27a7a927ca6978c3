pub mod alias;
pub mod identity;
pub mod issue;
pub mod key;
pub mod label;
pub mod milestone;
pub mod project;
pub mod reconcile;

pub use alias::UserAliasResolver;
pub use identity::IssueIdentityMap;
pub use key::EntityKind;
pub use reconcile::{op_list, OpKind};
