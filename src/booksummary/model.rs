use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;

/// Extension every newly created summary file carries.
pub const SUMMARY_EXT: &str = ".txt";

/// The three storage destinations a summary can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// App-private internal storage.
    Internal,
    /// App-private directory on external storage.
    PrivateExternal,
    /// Storage visible to other applications.
    Shared,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Internal, Tier::PrivateExternal, Tier::Shared];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Internal => "internal",
            Tier::PrivateExternal => "private-external",
            Tier::Shared => "shared",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "internal" | "i" => Ok(Tier::Internal),
            "private-external" | "private_external" | "external" | "e" => {
                Ok(Tier::PrivateExternal)
            }
            "shared" | "public" | "s" => Ok(Tier::Shared),
            other => Err(format!("Unknown tier: {}", other)),
        }
    }
}

/// One named text summary. `(tier, name)` is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub body: String,
    pub tier: Tier,
}

impl Record {
    pub fn new(tier: Tier, name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            tier,
        }
    }

    /// The file name used when this record is created.
    pub fn file_name(&self) -> String {
        normalize_file_name(&self.name)
    }
}

/// Strips every `.txt` occurrence from `name` and appends a single one.
///
/// Only the create path normalizes; update and delete use the name as given.
pub fn normalize_file_name(name: &str) -> String {
    format!("{}{}", name.replace(SUMMARY_EXT, ""), SUMMARY_EXT)
}

/// True when `name` is a single plain path component: not empty, no
/// separators, not `.` or `..`, not rooted.
///
/// Every name that ends up joined onto a storage directory must pass this.
pub fn is_valid_entry_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_appends_extension() {
        assert_eq!(normalize_file_name("Dune"), "Dune.txt");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_file_name("Dune.txt");
        assert_eq!(once, "Dune.txt");
        assert_eq!(normalize_file_name(&once), once);
    }

    #[test]
    fn normalize_strips_inner_occurrences() {
        assert_eq!(normalize_file_name("notes.txt.backup"), "notes.backup.txt");
    }

    #[test]
    fn entry_names_must_be_single_components() {
        assert!(is_valid_entry_name("Dune.txt"));
        assert!(is_valid_entry_name("..hidden.txt"));
        let rejected = [
            "",
            ".",
            "..",
            "../victim.txt",
            "/tmp/victim.txt",
            "a\\b.txt",
            "dir/",
        ];
        for name in rejected {
            assert!(!is_valid_entry_name(name), "accepted {:?}", name);
        }
    }

    #[test]
    fn tier_parses_aliases() {
        assert_eq!("Internal".parse::<Tier>().unwrap(), Tier::Internal);
        assert_eq!("external".parse::<Tier>().unwrap(), Tier::PrivateExternal);
        assert_eq!("public".parse::<Tier>().unwrap(), Tier::Shared);
        assert!("cloud".parse::<Tier>().is_err());
    }

    #[test]
    fn tier_display_roundtrips_through_from_str() {
        for tier in Tier::ALL {
            assert_eq!(tier.to_string().parse::<Tier>().unwrap(), tier);
        }
    }
}
