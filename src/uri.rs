use std::collections::btree_map::{self, BTreeMap};
use url::form_urlencoded;

/// Query or form parameters: each name maps to one or more values, names
/// kept in sorted order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, Vec<String>>,
}

impl Params {
    pub fn new() -> Self {
        Params::default()
    }

    /// Appends a value to `key`, keeping values already present.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values
            .entry(key.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Replaces every value of `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), vec![value.into()]);
        self
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Flattened `(name, value)` pairs, ordered by name then insertion.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// `application/x-www-form-urlencoded` rendering: `a=1&b=x+y`.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.add(k, v);
        }
        params
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Joins `path` onto `base`, dropping a single leading `/` from `path`.
/// An empty path leaves `base` untouched.
pub fn append_path(base: &str, path: &str) -> String {
    let path = path.strip_prefix('/').unwrap_or(path);
    format!("{}{}", base, path)
}

/// Appends `?` and the encoded parameters to `base` unless there are none.
pub fn create_request_uri(base: &str, params: &Params) -> String {
    if params.is_empty() {
        return base.to_string();
    }
    format!("{}?{}", base, params.encode())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_path() {
        assert_eq!(append_path("base", "path"), "basepath");
        assert_eq!(append_path("base", "/path"), "basepath");
        // only one separator is dropped
        assert_eq!(append_path("base", "//path"), "base/path");
        assert_eq!(append_path("https://api.tumblr.com/v2/", "user/info"), "https://api.tumblr.com/v2/user/info");
    }

    #[test]
    fn test_append_empty_path() {
        assert_eq!(append_path("base", ""), "base");
        assert_eq!(append_path("base", "/"), "base");
    }

    #[test]
    fn test_create_request_uri() {
        let cases: Vec<(Params, &str)> = vec![
            (Params::new(), "base"),
            (Params::from([("test", "")]), "base?test="),
            (Params::from([("test", "value")]), "base?test=value"),
            (
                Params::from([("test", "value with space")]),
                "base?test=value+with+space",
            ),
            (
                Params::from([("test2", "value2"), ("test1", "value1")]),
                "base?test1=value1&test2=value2",
            ),
            (
                Params::from([("tag", "a"), ("tag", "b")]),
                "base?tag=a&tag=b",
            ),
        ];
        for (params, expected) in cases {
            assert_eq!(create_request_uri("base", &params), expected, "{:?}", params);
        }
    }

    #[test]
    fn test_params_set_replaces_values() {
        let mut params = Params::new();
        params.add("limit", "10").add("limit", "20");
        assert_eq!(params.get_all("limit"), ["10", "20"]);
        params.set("limit", "5");
        assert_eq!(params.get("limit"), Some("5"));
        assert_eq!(params.len(), 1);
        assert!(params.get("offset").is_none());
        assert!(params.get_all("offset").is_empty());
    }

    #[test]
    fn test_params_encoding_escapes_reserved() {
        let params = Params::from([("q", "a&b=c"), ("emoji", "é")]);
        assert_eq!(params.encode(), "emoji=%C3%A9&q=a%26b%3Dc");
    }
}
