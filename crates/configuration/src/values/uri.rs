use std::fmt;

use url::Url;

const MASK: &str = "***";

/// Connection string for a PostgreSQL database.
///
/// The password is never printed: `Debug` and `redacted` replace it with `***`,
/// whether it sits in the authority or in a `password` query parameter.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionUri(pub String);

impl ConnectionUri {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The connection string with every password masked.
    ///
    /// A string that does not parse as a URL is masked entirely.
    pub fn redacted(&self) -> String {
        let Ok(mut url) = Url::parse(&self.0) else {
            return MASK.to_string();
        };

        if url.password().is_some() && url.set_password(Some(MASK)).is_err() {
            return MASK.to_string();
        }

        if url.query_pairs().any(|(key, _)| key == "password") {
            let pairs: Vec<(String, String)> = url
                .query_pairs()
                .map(|(key, value)| {
                    let value = if key == "password" {
                        MASK.to_string()
                    } else {
                        value.into_owned()
                    };
                    (key.into_owned(), value)
                })
                .collect();
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }

        url.to_string()
    }
}

impl fmt::Debug for ConnectionUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionUri").field(&self.redacted()).finish()
    }
}

impl From<String> for ConnectionUri {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ConnectionUri {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}
