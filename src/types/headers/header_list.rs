use std::fmt;

use crate::types::headers::header_name::HeaderName;
use crate::types::headers::typed_header::TypedHeader;

/// An ordered run of same-named header values.
///
/// All multi-valued headers share this one container, tagged with the name
/// its items render under. A list stored in a message is never empty; the
/// message drops the entry when the last item is removed.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderList {
    name: HeaderName,
    items: Vec<TypedHeader>,
}

impl HeaderList {
    /// Creates an empty list for the given header name.
    pub fn new(name: HeaderName) -> Self {
        HeaderList {
            name,
            items: Vec::new(),
        }
    }

    /// Creates a list holding a single value.
    pub fn singleton(header: TypedHeader) -> Self {
        HeaderList {
            name: header.name(),
            items: vec![header],
        }
    }

    /// The name this list's items render under.
    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Appends a value at the back.
    pub fn push(&mut self, header: TypedHeader) {
        self.items.push(header);
    }

    /// Inserts a value at the front.
    pub fn push_front(&mut self, header: TypedHeader) {
        self.items.insert(0, header);
    }

    /// Removes and returns the first value.
    pub fn remove_first(&mut self) -> Option<TypedHeader> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    /// Removes and returns the last value.
    pub fn remove_last(&mut self) -> Option<TypedHeader> {
        self.items.pop()
    }

    pub fn first(&self) -> Option<&TypedHeader> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&TypedHeader> {
        self.items.last()
    }

    pub fn get(&self, index: usize) -> Option<&TypedHeader> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TypedHeader> {
        self.items.iter()
    }

    /// Merges two lists into a new one, leaving both operands untouched.
    /// With `at_top` the other list's items come first.
    pub fn concatenate(&self, other: &HeaderList, at_top: bool) -> HeaderList {
        let mut items = Vec::with_capacity(self.items.len() + other.items.len());
        if at_top {
            items.extend(other.items.iter().cloned());
            items.extend(self.items.iter().cloned());
        } else {
            items.extend(self.items.iter().cloned());
            items.extend(other.items.iter().cloned());
        }
        HeaderList {
            name: self.name.clone(),
            items,
        }
    }
}

impl fmt::Display for HeaderList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            writeln!(f, "{}", item)?;
        }
        Ok(())
    }
}

impl IntoIterator for HeaderList {
    type Item = TypedHeader;
    type IntoIter = std::vec::IntoIter<TypedHeader>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a HeaderList {
    type Item = &'a TypedHeader;
    type IntoIter = std::slice::Iter<'a, TypedHeader>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
