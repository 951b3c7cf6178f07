use std::fmt;

use keystore_types::Entries;

/// Human-readable dump of a keystore, produced by
/// [`Keystore::describe`](crate::Keystore::describe).
///
/// ```text
/// Filename: /.config
/// brightness: 5
/// File is dirty
/// Storage is not persistent
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Description<'a> {
    filename: &'a str,
    entries: &'a Entries,
    dirty: bool,
    persistent: bool,
}

impl<'a> Description<'a> {
    pub(crate) fn new(filename: &'a str, entries: &'a Entries, dirty: bool, persistent: bool) -> Self {
        Self {
            filename,
            entries,
            dirty,
            persistent,
        }
    }
}

impl fmt::Display for Description<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Filename: {}", self.filename)?;
        for (key, value) in self.entries {
            writeln!(f, "{key}: {value}")?;
        }
        if self.dirty {
            writeln!(f, "File is dirty")?;
        }
        if !self.persistent {
            writeln!(f, "Storage is not persistent")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystore_types::Value;

    fn entries() -> Entries {
        let mut entries = Entries::new();
        entries.insert("brightness".into(), Value::Int(5));
        entries.insert("name".into(), Value::from("lamp"));
        entries
    }

    #[test]
    fn clean_persistent_store() {
        let entries = entries();
        let text = Description::new("/.config", &entries, false, true).to_string();
        assert_eq!(text, "Filename: /.config\nbrightness: 5\nname: lamp\n");
    }

    #[test]
    fn flags_dirty_and_not_persistent() {
        let entries = Entries::new();
        let text = Description::new("/.config", &entries, true, false).to_string();
        assert_eq!(
            text,
            "Filename: /.config\nFile is dirty\nStorage is not persistent\n"
        );
    }
}
