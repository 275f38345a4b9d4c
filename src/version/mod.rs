pub mod compare;
pub mod rules;

pub use compare::{is_forge_gradle3, version_at_least};
pub use rules::{is_library_compatible, mojang_os, LibraryRule, OsRule, RuleAction};
