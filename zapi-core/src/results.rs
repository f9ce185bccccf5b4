//! Result-list helpers
//!
//! `*.get` methods always answer with a list, even when the caller looked up a
//! single object by id. These helpers turn "wrong number of items" into the
//! matching [`Error`] kind.

use crate::error::{Error, Result};

/// Take the only element of a list
///
/// # Examples
///
/// ```rust
/// use zapi_core::results::expect_one;
///
/// assert_eq!(expect_one(vec!["10084"]).unwrap(), "10084");
/// assert!(expect_one(Vec::<&str>::new()).is_err());
/// ```
pub fn expect_one<T>(items: Vec<T>) -> Result<T> {
    let count = items.len();
    let mut items = items.into_iter();
    match (items.next(), items.next()) {
        (Some(item), None) => Ok(item),
        _ => Err(Error::ExpectedOne(count)),
    }
}

/// Check that a list has exactly `expected` elements
pub fn expect_count<T>(items: Vec<T>, expected: usize) -> Result<Vec<T>> {
    if items.len() == expected {
        Ok(items)
    } else {
        Err(Error::ExpectedMore {
            expected,
            got: items.len(),
        })
    }
}
