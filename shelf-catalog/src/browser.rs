//! Browsers that links can be opened in.
//!
//! Browsers are not persisted. A browser is identified by a hash of its name
//! so that settings can refer to it across runs; the two built-in entries
//! use fixed hashes.

/// Hash of the built-in in-app browser.
pub const INTEGRATED_HASH: i64 = 0;
/// Hash of the user-configured executable entry.
pub const CUSTOM_HASH: i64 = -1;

/// Name fragments and the flag that opens a private window in a matching
/// browser. The first match wins.
const PRIVATE_ARGS: &[(&str, &str)] = &[
    ("Opera", "-private"),
    ("Chrom", "-incognito"),
    ("Brave", "-incognito"),
    ("Edge", "-inprivate"),
    ("fox", "-private-window"),
    ("Zen", "-private-window"),
    ("LibreWolf", "-private-window"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Browser {
    name: String,
    hash: i64,
    args: Vec<String>,
    private_arg: Option<&'static str>,
    index: usize,
}

impl Browser {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let hash = Self::make_hash(&name);
        Self::with_hash(name, hash)
    }

    pub fn with_hash(name: impl Into<String>, hash: i64) -> Self {
        let name = name.into();
        let private_arg = PRIVATE_ARGS
            .iter()
            .find(|(search, _)| name.contains(search))
            .map(|(_, arg)| *arg);
        Self {
            name,
            hash,
            args: Vec::new(),
            private_arg,
            index: 0,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// The last 12 hex digits of the name's MD5 digest, as an integer.
    pub fn make_hash(name: &str) -> i64 {
        let digest = md5::compute(name.as_bytes());
        digest.0[10..]
            .iter()
            .fold(0i64, |acc, byte| (acc << 8) | i64::from(*byte))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash(&self) -> i64 {
        self.hash
    }

    /// `"{name}###{hash}"`, unique per browser.
    pub fn hashed_name(&self) -> String {
        format!("{}###{}", self.name, self.hash)
    }

    pub fn is_integrated(&self) -> bool {
        self.hash == INTEGRATED_HASH
    }

    pub fn is_custom(&self) -> bool {
        self.hash == CUSTOM_HASH
    }

    pub fn private_arg(&self) -> Option<&'static str> {
        self.private_arg
    }

    /// Position in the registry's display order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Launch arguments, with the private-window flag first if requested
    /// and known.
    pub fn launch_args(&self, private: bool) -> Vec<String> {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        if private {
            args.extend(self.private_arg.map(str::to_string));
        }
        args.extend(self.args.iter().cloned());
        args
    }
}

/// Known browsers in display order.
///
/// The integrated browser is always the first entry; nothing is ever removed.
#[derive(Debug, Clone)]
pub struct BrowserRegistry {
    browsers: Vec<Browser>,
}

impl Default for BrowserRegistry {
    fn default() -> Self {
        let mut registry = Self {
            browsers: Vec::new(),
        };
        registry.add(Browser::with_hash("Integrated", INTEGRATED_HASH));
        registry.add(Browser::with_hash("Custom", CUSTOM_HASH));
        registry
    }
}

impl BrowserRegistry {
    /// A registry holding the integrated and custom entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a browser. A browser whose hashed name is already known is
    /// ignored and `false` is returned.
    pub fn add(&mut self, mut browser: Browser) -> bool {
        let key = browser.hashed_name();
        if self.get_by_hashed_name(&key).is_some() {
            return false;
        }
        browser.index = self.browsers.len();
        self.browsers.push(browser);
        true
    }

    /// Look up by hash, falling back to the integrated browser.
    pub fn get(&self, hash: i64) -> &Browser {
        self.browsers
            .iter()
            .find(|b| b.hash == hash)
            .unwrap_or(&self.browsers[0])
    }

    pub fn get_by_hashed_name(&self, hashed_name: &str) -> Option<&Browser> {
        self.browsers.iter().find(|b| b.hashed_name() == hashed_name)
    }

    /// Browsers in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Browser> {
        self.browsers.iter()
    }

    pub fn len(&self) -> usize {
        self.browsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.browsers.is_empty()
    }
}
