//! Parsing for the plugin parameter string.
//!
//! `protoc` passes every plugin a single comma-separated `key=value,key2,...`
//! string (the same convention `protoc-gen-cpp`, `protoc-gen-go`, etc. use for
//! their own flags). This generator currently defines no flags of its own —
//! the parameter is documented as ignored — but we still parse it into a real
//! map rather than discarding it outright, so a future flag has somewhere to
//! land without changing the plugin's wire contract.

use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PluginOptions {
    flags: BTreeMap<String, String>,
}

impl PluginOptions {
    pub fn parse(parameter: &str) -> Self {
        let mut flags = BTreeMap::new();
        for entry in parameter.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            match entry.split_once('=') {
                Some((k, v)) => {
                    flags.insert(k.trim().to_string(), v.trim().to_string());
                }
                None => {
                    flags.insert(entry.to_string(), String::new());
                }
            }
        }
        PluginOptions { flags }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.flags.get(key).map(String::as_str)
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.flags.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_parameter_yields_no_flags() {
        let opts = PluginOptions::parse("");
        assert!(!opts.is_set("anything"));
    }

    #[test]
    fn parses_key_value_pairs() {
        let opts = PluginOptions::parse("foo=bar, baz , quux=1");
        assert_eq!(opts.get("foo"), Some("bar"));
        assert_eq!(opts.get("baz"), Some(""));
        assert_eq!(opts.get("quux"), Some("1"));
    }
}
