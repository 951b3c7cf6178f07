use std::fmt;

/// The store's target file, split once into directory and leaf name.
///
/// The directory always ends with `/` and is the one listed to check for the
/// leaf. A bare file name lives in the storage root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorePath {
    full: String,
    dir: String,
    file: String,
}

impl StorePath {
    pub fn parse(path: &str) -> Self {
        let (dir, file) = match path.rfind('/') {
            Some(at) => (&path[..=at], &path[at + 1..]),
            None => ("/", path),
        };
        Self {
            full: path.to_string(),
            dir: dir.to_string(),
            file: file.to_string(),
        }
    }

    /// The path as given.
    pub fn full(&self) -> &str {
        &self.full
    }

    /// Directory part, with trailing `/`.
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Leaf file name.
    pub fn file(&self) -> &str {
        &self.file
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_file() {
        let p = StorePath::parse("/.config");
        assert_eq!(p.dir(), "/");
        assert_eq!(p.file(), ".config");
        assert_eq!(p.full(), "/.config");
    }

    #[test]
    fn nested_file() {
        let p = StorePath::parse("/settings/net.cfg");
        assert_eq!(p.dir(), "/settings/");
        assert_eq!(p.file(), "net.cfg");
    }

    #[test]
    fn bare_name_lives_in_root() {
        let p = StorePath::parse("config.txt");
        assert_eq!(p.dir(), "/");
        assert_eq!(p.file(), "config.txt");
        assert_eq!(p.to_string(), "config.txt");
    }

    #[test]
    fn trailing_slash_has_empty_leaf() {
        let p = StorePath::parse("/settings/");
        assert_eq!(p.dir(), "/settings/");
        assert!(p.file().is_empty());
    }
}
