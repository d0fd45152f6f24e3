use std::fmt;

/// Guest e-mail wrapper for log output.
///
/// Keeps the first character of the local part and the full domain, so
/// `tracing::info!(guest = %MaskedEmail(&email))` never prints the address.
#[derive(Clone, Copy)]
pub struct MaskedEmail<'a>(pub &'a str);

impl fmt::Display for MaskedEmail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) => write!(f, "{}***@{}", first, domain),
                None => write!(f, "***@{}", domain),
            },
            None => write!(f, "********"),
        }
    }
}

impl fmt::Debug for MaskedEmail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
