use std::fmt;

/// Location of the node being visited, rendered as `$.animals[0].name`.
///
/// Lives on the stack of the recursive walk; it is only formatted when an
/// error is raised.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Trail<'a> {
    Root,
    Index(&'a Trail<'a>, usize),
    Key(&'a Trail<'a>, &'a str),
}

impl<'a> Trail<'a> {
    pub(crate) fn index(&'a self, index: usize) -> Trail<'a> {
        Trail::Index(self, index)
    }

    pub(crate) fn key<'b>(&'b self, key: &'b str) -> Trail<'b>
    where
        'a: 'b,
    {
        Trail::Key(self, key)
    }
}

impl fmt::Display for Trail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trail::Root => write!(f, "$"),
            Trail::Index(parent, index) => write!(f, "{}[{}]", parent, index),
            Trail::Key(parent, key) => write!(f, "{}.{}", parent, key),
        }
    }
}
