//! Recipient address lists.

/// One address or an arbitrarily nested sequence of addresses.
///
/// Every recipient method accepts `impl Into<Addresses>`, so a single
/// `&str`, a `Vec`, an array or nested sequences can all be passed and are
/// flattened in order.
///
/// ```rust
/// use integrations_postal::Addresses;
///
/// let nested = Addresses::from(vec![vec!["a@example.com", "b@example.com"], vec!["c@example.com"]]);
/// assert_eq!(
///     nested.flatten(),
///     vec!["a@example.com", "b@example.com", "c@example.com"]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addresses {
    /// A single address.
    One(String),
    /// An ordered sequence, possibly nested.
    Many(Vec<Addresses>),
}

impl Addresses {
    /// Builds a sequence from anything iterable.
    pub fn many<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Addresses>,
    {
        Addresses::Many(items.into_iter().map(Into::into).collect())
    }

    /// Flattens into an ordered list of address strings.
    pub fn flatten(self) -> Vec<String> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<String>) {
        match self {
            Addresses::One(address) => out.push(address),
            Addresses::Many(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

impl From<&str> for Addresses {
    fn from(address: &str) -> Self {
        Addresses::One(address.to_string())
    }
}

impl From<String> for Addresses {
    fn from(address: String) -> Self {
        Addresses::One(address)
    }
}

impl From<&String> for Addresses {
    fn from(address: &String) -> Self {
        Addresses::One(address.clone())
    }
}

impl<T: Into<Addresses>> From<Vec<T>> for Addresses {
    fn from(items: Vec<T>) -> Self {
        Addresses::many(items)
    }
}

impl<T: Into<Addresses>, const N: usize> From<[T; N]> for Addresses {
    fn from(items: [T; N]) -> Self {
        Addresses::many(items)
    }
}

impl<T: Into<Addresses> + Clone> From<&[T]> for Addresses {
    fn from(items: &[T]) -> Self {
        Addresses::many(items.iter().cloned())
    }
}
