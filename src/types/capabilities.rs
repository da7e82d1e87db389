use std::collections::hash_set::Iter;
use std::collections::HashSet;

/// From [section 7.2.1 of RFC 3501](https://tools.ietf.org/html/rfc3501#section-7.2.1).
///
/// A list of capabilities that the server supports. Capability names are case-insensitive, so
/// they are stored upper-cased and looked up the same way.
///
/// Client implementations SHOULD NOT require any capability name other than `IMAP4rev1`, and MUST
/// ignore any unknown capability names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities(HashSet<String>);

impl Capabilities {
    /// Check if the server has the given capability.
    pub fn has(&self, name: &str) -> bool {
        self.0.contains(&name.to_ascii_uppercase())
    }

    /// Iterate over all the server's capabilities
    pub fn iter(&self) -> Iter<'_, String> {
        self.0.iter()
    }

    /// Returns how many capabilities the server has.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the server purports to have no capabilities.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Capabilities {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Capabilities(
            iter.into_iter()
                .map(|c| c.as_ref().to_ascii_uppercase())
                .collect(),
        )
    }
}

impl<S: AsRef<str>> Extend<S> for Capabilities {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|c| c.as_ref().to_ascii_uppercase()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let caps: Capabilities = ["IMAP4rev1", "sort", "THREAD=REFERENCES"].iter().collect();
        assert_eq!(caps.len(), 3);
        assert!(caps.has("SORT"));
        assert!(caps.has("thread=references"));
        assert!(!caps.has("THREAD=ORDEREDSUBJECT"));
    }
}
