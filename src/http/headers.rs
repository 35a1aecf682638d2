//! Case-insensitive header storage and the incremental header-block parser.

use crate::{
    errors::ErrorKind,
    http::types::{self, is_token},
};
use memchr::{memchr, memmem};

pub(crate) const CRLF: &[u8] = b"\r\n";

/// A set of header fields, keyed by lower-cased name.
///
/// Setting a name twice joins the values with a comma (the list syntax of
/// [RFC 9110, Section 5.3](https://datatracker.ietf.org/doc/html/rfc9110#section-5.3)),
/// so every name maps to exactly one string. Iteration follows the order in
/// which names were first set.
///
/// # Examples
/// ```
/// use craft_http::HeaderMap;
///
/// let mut headers = HeaderMap::new();
/// headers.set("Accept", "text/html");
/// headers.set("ACCEPT", "text/plain");
///
/// assert_eq!(headers.get("accept"), Some("text/html,text/plain"));
///
/// headers.replace("Accept", "*/*");
/// assert_eq!(headers.get("Accept"), Some("*/*"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.entries[i].1.as_str())
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Adds a value, appending it to an existing one with a comma.
    pub fn set<N: AsRef<str>, V: AsRef<str>>(&mut self, name: N, value: V) {
        let (name, value) = (name.as_ref(), value.as_ref());

        match self.position(name) {
            Some(i) => {
                let prev = &mut self.entries[i].1;
                prev.push(',');
                prev.push_str(value);
            }
            None => self
                .entries
                .push((types::lower_name(name), value.to_owned())),
        }
    }

    /// Sets a value, dropping whatever was stored under the name.
    pub fn replace<N: AsRef<str>, V: AsRef<str>>(&mut self, name: N, value: V) {
        let (name, value) = (name.as_ref(), value.as_ref());

        match self.position(name) {
            Some(i) => self.entries[i].1 = value.to_owned(),
            None => self
                .entries
                .push((types::lower_name(name), value.to_owned())),
        }
    }

    /// Removes a field, returning its value.
    pub fn delete(&mut self, name: &str) -> Option<String> {
        let i = self.position(name)?;
        Some(self.entries.remove(i).1)
    }

    /// `(name, value)` pairs with lower-cased names.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[inline]
    pub fn for_each<F: FnMut(&str, &str)>(&self, mut visit: F) {
        for (name, value) in self.iter() {
            visit(name, value);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

impl<N: AsRef<str>, V: AsRef<str>> FromIterator<(N, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = HeaderMap::new();
        for (name, value) in iter {
            headers.set(name, value);
        }
        headers
    }
}

// Parser
impl HeaderMap {
    /// Consumes the complete `name: value\r\n` lines at the start of `data`.
    ///
    /// Returns how many bytes were consumed and whether the empty line that
    /// ends the header block was reached (its `\r\n` counts as consumed).
    /// An unfinished trailing line is left alone; call again once more
    /// bytes have arrived.
    ///
    /// On error nothing should be considered consumed and the parse is over.
    /// Fields stored before the faulty line stay in the map.
    ///
    /// # Examples
    /// ```
    /// use craft_http::HeaderMap;
    ///
    /// let mut headers = HeaderMap::new();
    ///
    /// assert_eq!(headers.parse(b"Host: localhost:42069\r\nAcc"), Ok((23, false)));
    /// assert_eq!(headers.parse(b"Accept: */*\r\n\r\n"), Ok((15, true)));
    /// assert_eq!(headers.get("host"), Some("localhost:42069"));
    /// ```
    pub fn parse(&mut self, data: &[u8]) -> Result<(usize, bool), ErrorKind> {
        let mut read = 0;

        loop {
            let Some(end) = memmem::find(&data[read..], CRLF) else {
                return Ok((read, false));
            };

            if end == 0 {
                return Ok((read + CRLF.len(), true));
            }

            let (name, value) = parse_field_line(&data[read..read + end])?;
            self.set(name, value);

            read += end + CRLF.len();
        }
    }
}

fn parse_field_line(line: &[u8]) -> Result<(&str, &str), ErrorKind> {
    let colon = memchr(b':', line).ok_or(ErrorKind::InvalidFieldLine)?;
    let (name, value) = (&line[..colon], &line[colon + 1..]);

    if !is_token(name) {
        return Err(ErrorKind::InvalidFieldName);
    }

    let value = simdutf8::basic::from_utf8(value)
        .map_err(|_| ErrorKind::InvalidFieldLine)?
        .trim();

    // Token characters are ASCII
    let name = simdutf8::basic::from_utf8(name).map_err(|_| ErrorKind::InvalidFieldName)?;

    Ok((name, value))
}
