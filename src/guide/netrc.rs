//! Guide credentials from a `.netrc` file
//!
//! Supports the `machine`, `default`, `login`, `password` and `account`
//! tokens. `macdef` bodies are skipped up to the next blank line.

use std::io::ErrorKind;
use std::path::Path;

use super::error::{GuideError, GuideResult};

/// Login and password of one `.netrc` entry
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Default)]
struct Entry {
    /// `None` for the `default` entry
    machine: Option<String>,
    login: Option<String>,
    password: Option<String>,
}

/// Parsed `.netrc` content
#[derive(Debug, Default)]
pub struct Netrc {
    entries: Vec<Entry>,
}

impl Netrc {
    pub fn parse(content: &str) -> Self {
        let mut entries: Vec<Entry> = Vec::new();
        let mut in_macdef = false;
        let mut pending_key: Option<String> = None;

        for line in content.lines() {
            if in_macdef {
                if line.trim().is_empty() {
                    in_macdef = false;
                }
                continue;
            }

            for token in line.split_whitespace() {
                if let Some(key) = pending_key.take() {
                    let Some(entry) = entries.last_mut() else {
                        continue;
                    };
                    match key.as_str() {
                        "machine" => entry.machine = Some(token.to_string()),
                        "login" => entry.login = Some(token.to_string()),
                        "password" => entry.password = Some(token.to_string()),
                        _ => {}
                    }
                    continue;
                }

                match token {
                    "machine" => {
                        entries.push(Entry::default());
                        pending_key = Some(token.to_string());
                    }
                    "default" => entries.push(Entry::default()),
                    "login" | "password" | "account" => pending_key = Some(token.to_string()),
                    "macdef" => {
                        // Name on this line, body up to the next blank line
                        in_macdef = true;
                        break;
                    }
                    _ => {}
                }
            }
        }

        Self { entries }
    }

    /// Read `path`; a missing file yields no entries
    pub fn from_file(path: &Path) -> GuideResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Self::parse(&content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(GuideError::io(path, e)),
        }
    }

    /// Credentials for `host`, falling back to the `default` entry
    pub fn credentials(&self, host: &str) -> Option<Credentials> {
        let machine = self
            .entries
            .iter()
            .find(|e| e.machine.as_deref().is_some_and(|m| m.eq_ignore_ascii_case(host)));
        let entry = machine.or_else(|| self.entries.iter().find(|e| e.machine.is_none()))?;

        Some(Credentials {
            login: entry.login.clone()?,
            password: entry.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
machine www.media-select.fr
  login alice
  password s3cret

machine other.example.org login bob password hunter2

macdef init
machine evil.example.org login mallory password nope

default login anonymous password guest
";

    #[test]
    fn test_machine_entry() {
        let netrc = Netrc::parse(SAMPLE);
        let creds = netrc.credentials("www.media-select.fr").unwrap();
        assert_eq!(creds.login, "alice");
        assert_eq!(creds.password.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_single_line_entry() {
        let netrc = Netrc::parse(SAMPLE);
        let creds = netrc.credentials("OTHER.example.org").unwrap();
        assert_eq!(creds.login, "bob");
    }

    #[test]
    fn test_macdef_body_ignored() {
        let netrc = Netrc::parse(SAMPLE);
        let creds = netrc.credentials("evil.example.org").unwrap();
        assert_eq!(creds.login, "anonymous");
    }

    #[test]
    fn test_no_match_without_default() {
        let netrc = Netrc::parse("machine a.example login x password y\n");
        assert!(netrc.credentials("b.example").is_none());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let netrc = Netrc::from_file(&dir.path().join(".netrc")).unwrap();
        assert!(netrc.credentials("www.media-select.fr").is_none());
    }

    #[test]
    fn test_password_redacted() {
        let creds = Netrc::parse(SAMPLE).credentials("www.media-select.fr").unwrap();
        assert!(!format!("{creds:?}").contains("s3cret"));
    }
}
