//! Typed view over a parsed data source.

use base64::prelude::*;
use std::collections::BTreeMap;

/// Names of the canonical keys in the flat mapping representation.
pub mod keys {
    /// Driver / scheme name.
    pub const DRIVER: &str = "driver";
    /// Host name.
    pub const HOSTNAME: &str = "hostname";
    /// Port, kept as written.
    pub const PORT: &str = "port";
    /// Login / user name.
    pub const LOGIN: &str = "login";
    /// Password.
    pub const PASSWORD: &str = "password";
    /// Database name or file path.
    pub const DATABASE: &str = "database";
}

/// All canonical keys. Any other key is an option.
pub const CANONICAL_KEYS: [&str; 6] = [
    keys::DRIVER,
    keys::HOSTNAME,
    keys::PORT,
    keys::LOGIN,
    keys::PASSWORD,
    keys::DATABASE,
];

/// A data source: the six canonical connection fields plus free-form options.
///
/// Canonical fields and options live in separate stores, but the
/// `option`/`set_option` family treats them as one flat string mapping, so
/// `ds.option("hostname")` and `ds.host()` read the same value.
///
/// A field that was never set is absent from the mapping; the typed getters
/// report it as an empty string. Parsing always sets all six fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        from = "BTreeMap<String, String>",
        into = "BTreeMap<String, String>"
    )
)]
pub struct DataSource {
    driver: Option<String>,
    host: Option<String>,
    port: Option<String>,
    login: Option<String>,
    password: Option<String>,
    database: Option<String>,
    options: BTreeMap<String, String>,
}

fn text(slot: &Option<String>) -> &str {
    slot.as_deref().unwrap_or("")
}

impl DataSource {
    /// Create an empty data source with no keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a data source from a flat key-value mapping.
    pub fn from_map<K, V>(map: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut ds = Self::new();
        for (key, value) in map {
            ds.set_option(key, value);
        }
        ds
    }

    /// Flatten into a single mapping, canonical keys included.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = self.options.clone();
        for key in CANONICAL_KEYS {
            if let Some(Some(value)) = self.field(key) {
                map.insert(key.to_string(), value.clone());
            }
        }
        map
    }

    fn field(&self, name: &str) -> Option<&Option<String>> {
        match name {
            keys::DRIVER => Some(&self.driver),
            keys::HOSTNAME => Some(&self.host),
            keys::PORT => Some(&self.port),
            keys::LOGIN => Some(&self.login),
            keys::PASSWORD => Some(&self.password),
            keys::DATABASE => Some(&self.database),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            keys::DRIVER => Some(&mut self.driver),
            keys::HOSTNAME => Some(&mut self.host),
            keys::PORT => Some(&mut self.port),
            keys::LOGIN => Some(&mut self.login),
            keys::PASSWORD => Some(&mut self.password),
            keys::DATABASE => Some(&mut self.database),
            _ => None,
        }
    }

    /// Get the driver name.
    pub fn driver(&self) -> &str {
        text(&self.driver)
    }

    /// Set the driver name.
    pub fn set_driver(&mut self, driver: impl Into<String>) {
        self.driver = Some(driver.into());
    }

    /// Get the host name.
    pub fn host(&self) -> &str {
        text(&self.host)
    }

    /// Set the host name.
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = Some(host.into());
    }

    /// Get the port as a number.
    ///
    /// Any non-negative decimal is returned as written, even past 65535.
    /// Returns `0` when the port is missing, negative, or not numeric.
    pub fn port(&self) -> u32 {
        self.port_str().parse().unwrap_or(0)
    }

    /// Get the port exactly as it was written.
    pub fn port_str(&self) -> &str {
        text(&self.port)
    }

    /// Set the port.
    pub fn set_port(&mut self, port: u32) {
        self.port = Some(port.to_string());
    }

    /// Get the login.
    pub fn login(&self) -> &str {
        text(&self.login)
    }

    /// Set the login.
    pub fn set_login(&mut self, login: impl Into<String>) {
        self.login = Some(login.into());
    }

    /// Get the password.
    pub fn password(&self) -> &str {
        text(&self.password)
    }

    /// Set the password.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Some(password.into());
    }

    /// Get the database name or path.
    pub fn database(&self) -> &str {
        text(&self.database)
    }

    /// Set the database name or path.
    pub fn set_database(&mut self, database: impl Into<String>) {
        self.database = Some(database.into());
    }

    /// Look up any key, canonical or not.
    ///
    /// A key stored with an empty value still counts as present.
    pub fn option(&self, name: &str) -> Option<&str> {
        match self.field(name) {
            Some(slot) => slot.as_deref(),
            None => self.options.get(name).map(String::as_str),
        }
    }

    /// Look up a key, falling back to `defaults` joined with `;`.
    ///
    /// ```rust
    /// use dsn_core::DataSource;
    ///
    /// let ds = DataSource::parse("pg://h/db?timeout=").unwrap();
    /// assert_eq!(ds.option_or("timeout", &["30"]), "");
    /// assert_eq!(ds.option_or("sslmode", &["disable"]), "disable");
    /// assert_eq!(ds.option_or("missing", &["a", "b"]), "a;b");
    /// assert_eq!(ds.option_or("missing", &[]), "");
    /// ```
    pub fn option_or(&self, name: &str, defaults: &[&str]) -> String {
        match self.option(name) {
            Some(value) => value.to_string(),
            None => defaults.join(";"),
        }
    }

    /// Check whether a key is present.
    pub fn contains(&self, name: &str) -> bool {
        self.option(name).is_some()
    }

    /// Store any key. Canonical names update the matching field.
    pub fn set_option(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        match self.field_mut(&name) {
            Some(slot) => *slot = Some(value.into()),
            None => {
                self.options.insert(name, value.into());
            }
        }
    }

    /// Remove a key, returning its previous value.
    pub fn remove_option(&mut self, name: &str) -> Option<String> {
        match self.field_mut(name) {
            Some(slot) => slot.take(),
            None => self.options.remove(name),
        }
    }

    /// Names of all non-canonical keys, in lexicographic order.
    pub fn option_names(&self) -> Vec<&str> {
        self.options.keys().map(String::as_str).collect()
    }

    /// Iterate over non-canonical key-value pairs, in lexicographic key order.
    pub fn options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check if no key has been stored.
    pub fn is_empty(&self) -> bool {
        CANONICAL_KEYS
            .iter()
            .all(|key| matches!(self.field(key), Some(None)))
            && self.options.is_empty()
    }

    /// Network address: `host`, `host:port`, or `host:default_port` when no port is stored.
    pub fn addr(&self, default_port: Option<u16>) -> String {
        let host = self.host();
        let port = self.port_str();
        if !port.is_empty() {
            format!("{host}:{port}")
        } else if let Some(default_port) = default_port {
            format!("{host}:{default_port}")
        } else {
            host.to_string()
        }
    }

    /// Like [`addr`](Self::addr), using only the first of `default_ports`.
    pub fn addr_or(&self, default_ports: &[u16]) -> String {
        self.addr(default_ports.first().copied())
    }

    /// Standard base64 of `login:password`, as used by HTTP basic auth.
    pub fn auth_basic_base64(&self) -> String {
        let basic = format!("{}:{}", self.login(), self.password());
        BASE64_STANDARD.encode(basic)
    }
}

impl<K, V> FromIterator<(K, V)> for DataSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(iter)
    }
}

impl<K, V> Extend<(K, V)> for DataSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set_option(key, value);
        }
    }
}

impl From<BTreeMap<String, String>> for DataSource {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self::from_map(map)
    }
}

impl From<DataSource> for BTreeMap<String, String> {
    fn from(ds: DataSource) -> Self {
        ds.to_map()
    }
}
