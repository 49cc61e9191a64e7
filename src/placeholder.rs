//! `{name}` token substitution for notification templates

/// Insertion-ordered set of placeholder values.
///
/// Substitution walks the entries in the order they were first inserted, so the
/// order in which a caller adds keys is observable (see [`substitute`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    entries: Vec<(String, String)>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Chainable form of [`Placeholders::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Placeholders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut placeholders = Placeholders::new();
        for (key, value) in iter {
            placeholders.insert(key, value);
        }
        placeholders
    }
}

/// Replaces every `{key}` in `template` with its value.
///
/// Keys are applied one after another over the progressively rewritten string,
/// not in a single simultaneous pass: a value that itself contains `{other}`
/// will be expanded if `other` comes later in the mapping. Tokens with no
/// matching key are left as-is and there is no escape syntax.
pub fn substitute(template: &str, values: &Placeholders) -> String {
    let mut result = template.to_string();
    for (key, value) in values.iter() {
        let token = format!("{{{}}}", key);
        if result.contains(&token) {
            result = result.replace(&token, value);
        }
    }
    result
}
