// ─── Platform Rules ───
// Decides whether a library or native artifact applies to the running
// platform, from Mojang-style rule lists and native-classifier maps.

use std::collections::HashMap;

use serde::Deserialize;

/// One entry of a library's `rules` list.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryRule {
    pub action: RuleAction,
    #[serde(default)]
    pub os: Option<OsRule>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsRule {
    #[serde(default)]
    pub name: Option<String>,
}

/// Mojang OS identifier for the current platform. Unknown platforms pass
/// through unchanged.
pub fn mojang_os() -> &'static str {
    match std::env::consts::OS {
        "macos" => "osx",
        "windows" => "windows",
        "linux" => "linux",
        other => other,
    }
}

/// Whether a library applies to the current platform.
///
/// A present rule list takes precedence and the natives map is ignored;
/// otherwise a present natives map must contain the current platform as a
/// key; with neither, the library is unconditionally compatible.
pub fn is_library_compatible(
    rules: Option<&[LibraryRule]>,
    natives: Option<&HashMap<String, String>>,
) -> bool {
    is_library_compatible_on(rules, natives, mojang_os())
}

fn is_library_compatible_on(
    rules: Option<&[LibraryRule]>,
    natives: Option<&HashMap<String, String>>,
    os: &str,
) -> bool {
    match rules {
        Some(rules) => validate_rules_on(rules, os),
        None => validate_natives_on(natives, os),
    }
}

/// The first rule carrying an OS constraint decides; a list without any
/// OS-qualified rule allows the library.
fn validate_rules_on(rules: &[LibraryRule], os: &str) -> bool {
    for rule in rules {
        if let Some(rule_os) = &rule.os {
            return match rule.action {
                RuleAction::Allow => rule_os.name.as_deref() == Some(os),
                RuleAction::Disallow => rule_os.name.as_deref() != Some(os),
            };
        }
    }
    true
}

fn validate_natives_on(natives: Option<&HashMap<String, String>>, os: &str) -> bool {
    match natives {
        Some(map) => map.contains_key(os),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow(os: &str) -> LibraryRule {
        LibraryRule {
            action: RuleAction::Allow,
            os: Some(OsRule {
                name: Some(os.to_string()),
            }),
        }
    }

    fn disallow(os: &str) -> LibraryRule {
        LibraryRule {
            action: RuleAction::Disallow,
            os: Some(OsRule {
                name: Some(os.to_string()),
            }),
        }
    }

    #[test]
    fn allow_rule_matches_only_named_platform() {
        let rules = vec![allow("linux")];
        assert!(is_library_compatible_on(Some(&rules), None, "linux"));
        assert!(!is_library_compatible_on(Some(&rules), None, "windows"));
    }

    #[test]
    fn disallow_rule_excludes_named_platform() {
        let rules = vec![disallow("osx")];
        assert!(!is_library_compatible_on(Some(&rules), None, "osx"));
        assert!(is_library_compatible_on(Some(&rules), None, "linux"));
    }

    #[test]
    fn first_os_qualified_rule_wins() {
        let rules = vec![allow("windows"), disallow("linux")];
        assert!(!is_library_compatible_on(Some(&rules), None, "linux"));
    }

    #[test]
    fn rules_without_os_constraint_allow() {
        let rules = vec![LibraryRule {
            action: RuleAction::Disallow,
            os: None,
        }];
        assert!(is_library_compatible_on(Some(&rules), None, "linux"));
    }

    #[test]
    fn natives_require_platform_key() {
        let mut natives = HashMap::new();
        natives.insert("windows".to_string(), "natives-windows".to_string());
        assert!(is_library_compatible_on(None, Some(&natives), "windows"));
        assert!(!is_library_compatible_on(None, Some(&natives), "linux"));
    }

    #[test]
    fn rules_take_precedence_over_natives() {
        let rules = vec![allow("linux")];
        let mut natives = HashMap::new();
        natives.insert("windows".to_string(), "natives-windows".to_string());
        assert!(is_library_compatible_on(Some(&rules), Some(&natives), "linux"));
    }

    #[test]
    fn no_rules_no_natives_is_compatible() {
        assert!(is_library_compatible_on(None, None, "linux"));
    }

    #[test]
    fn rules_deserialize_from_mojang_json() {
        let rules: Vec<LibraryRule> = serde_json::from_value(serde_json::json!([
            {"action": "allow", "os": {"name": "osx"}},
            {"action": "disallow"}
        ]))
        .unwrap();
        assert_eq!(rules[0].action, RuleAction::Allow);
        assert!(rules[1].os.is_none());
    }
}
