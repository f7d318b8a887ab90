use std::collections::BTreeMap;

use secrecy::SecretString;

/// Pre-configured values backing `{{env.NAME}}` references.
///
/// The engine never reads the process environment itself; the embedding
/// surface decides which names are visible to plans.
#[derive(Default)]
pub struct CredentialStore {
    values: BTreeMap<String, SecretString>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values
            .insert(name.into(), SecretString::from(value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&SecretString> {
        self.values.get(name)
    }

    /// Snapshot every UPPER_SNAKE process environment variable. Matches
    /// what reference names can address, nothing else.
    pub fn from_env() -> Self {
        let mut store = Self::new();
        for (name, value) in std::env::vars() {
            let mut chars = name.chars();
            let head_ok = chars.next().is_some_and(|c| c.is_ascii_uppercase());
            let rest_ok = chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
            if head_ok && rest_ok {
                store.insert(name, value);
            }
        }
        store
    }
}
