use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::Result;

/// Email to canonical contributor name, read from a `.mailmap` file.
///
/// Each line holds one or more `Name <email>` entries. The first name on a
/// line is the canonical name for every email on that line. When an email
/// appears again later, the first mapping is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mailmap {
    names: HashMap<String, String>,
}

impl Mailmap {
    /// Load `<repo_path>/.mailmap`. A missing file yields an empty map.
    pub fn load(repo_path: &Path) -> Result<Self> {
        let path = repo_path.join(".mailmap");
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let mailmap = Self::parse(&contents);
                debug!("Loaded {} mailmap entries from {}", mailmap.len(), path.display());
                Ok(mailmap)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(".mailmap file not found, continuing without it");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(contents: &str) -> Self {
        let mut names = HashMap::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut canonical: Option<&str> = None;
            for part in line.split('>') {
                let Some((name, email)) = part.split_once('<') else {
                    continue;
                };
                let name = name.trim();
                let email = email.trim();
                if email.is_empty() {
                    continue;
                }
                if canonical.is_none() && !name.is_empty() {
                    canonical = Some(name);
                }
                if let Some(canonical) = canonical {
                    names
                        .entry(email.to_string())
                        .or_insert_with(|| canonical.to_string());
                }
            }
        }
        Self { names }
    }

    /// Canonical name for an email, if mapped.
    pub fn resolve(&self, email: &str) -> Option<&str> {
        self.names.get(email).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_canonical_per_line() {
        let mailmap = Mailmap::parse(
            "Jane Doe <jane@example.com>\n\
             Jane Doe <jane@example.com> jd <jd@old.example.com>\n",
        );
        assert_eq!(mailmap.resolve("jane@example.com"), Some("Jane Doe"));
        assert_eq!(mailmap.resolve("jd@old.example.com"), Some("Jane Doe"));
        assert_eq!(mailmap.len(), 2);
    }

    #[test]
    fn test_first_mapping_wins() {
        let mailmap = Mailmap::parse(
            "First Name <shared@example.com>\n\
             Second Name <shared@example.com>\n",
        );
        assert_eq!(mailmap.resolve("shared@example.com"), Some("First Name"));
    }

    #[test]
    fn test_skips_comments_and_malformed() {
        let mailmap = Mailmap::parse(
            "# maintainers\n\n\
             no email on this line\n\
             Valid <valid@example.com>\n",
        );
        assert_eq!(mailmap.len(), 1);
        assert_eq!(mailmap.resolve("valid@example.com"), Some("Valid"));
        assert_eq!(mailmap.resolve("unknown@example.com"), None);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let mailmap = Mailmap::load(temp_dir.path()).unwrap();
        assert!(mailmap.is_empty());
    }

    #[test]
    fn test_load_from_repo_root() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(".mailmap"),
            "Canonical <a@example.com> <b@example.com>\n",
        )
        .unwrap();

        let mailmap = Mailmap::load(temp_dir.path()).unwrap();
        assert_eq!(mailmap.resolve("b@example.com"), Some("Canonical"));
    }
}
