use std::collections::HashMap;

/// Read access to environment-style variables.
pub trait EnvLookup {
    fn var(&self, name: &str) -> Option<String>;

    /// Returns the value only when it is present and non-empty.
    fn non_empty(&self, name: &str) -> Option<String> {
        self.var(name).filter(|value| !value.is_empty())
    }

    /// Returns the first non-empty value among `names`, in order.
    fn first_of(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| self.non_empty(name))
    }
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed set of variables, used in tests and for embedding.
#[derive(Debug, Clone, Default)]
pub struct MapEnv(HashMap<String, String>);

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl EnvLookup for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_of_skips_empty_values() {
        let env = MapEnv::new().with("A", "").with("B", "second").with("C", "third");

        assert_eq!(env.first_of(&["A", "B", "C"]), Some("second".to_string()));
        assert_eq!(env.first_of(&["C", "B"]), Some("third".to_string()));
        assert_eq!(env.first_of(&["A", "D"]), None);
    }

    #[test]
    fn test_map_env_from_iterator() {
        let env: MapEnv = [("X", "1")].into_iter().collect();
        assert_eq!(env.var("X"), Some("1".to_string()));
        assert_eq!(env.var("Y"), None);
    }
}
