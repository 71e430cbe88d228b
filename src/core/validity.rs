//! Field validity check shared by every entity that accepts loosely-typed input.
//!
//! A value is valid when it is present, is not `NaN` and is not a blank string.

use chrono::NaiveDate;

/// Types whose values can be checked for validity
pub trait Validity {
    /// Returns `true` if the value counts as recorded
    fn is_valid(&self) -> bool;
}

impl Validity for f64 {
    fn is_valid(&self) -> bool {
        !self.is_nan()
    }
}

impl Validity for str {
    fn is_valid(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Validity for String {
    fn is_valid(&self) -> bool {
        self.as_str().is_valid()
    }
}

impl Validity for bool {
    fn is_valid(&self) -> bool {
        true
    }
}

impl Validity for NaiveDate {
    fn is_valid(&self) -> bool {
        true
    }
}

impl<T: Validity + ?Sized> Validity for &T {
    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }
}

impl<T: Validity> Validity for Option<T> {
    fn is_valid(&self) -> bool {
        self.as_ref().is_some_and(Validity::is_valid)
    }
}

/// Check whether a value is present and usable
#[must_use]
pub fn is_value_valid<T: Validity + ?Sized>(value: &T) -> bool {
    value.is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_is_invalid() {
        assert!(!is_value_valid(&None::<f64>));
        assert!(!is_value_valid(&None::<NaiveDate>));
        assert!(!is_value_valid(&None::<bool>));
    }

    #[test]
    fn test_nan_is_invalid() {
        assert!(!is_value_valid(&f64::NAN));
        assert!(!is_value_valid(&Some(f64::NAN)));
        assert!(is_value_valid(&Some(2.3_f64)));
    }

    #[test]
    fn test_blank_string_is_invalid() {
        assert!(!is_value_valid(""));
        assert!(!is_value_valid("   "));
        assert!(!is_value_valid(&Some(String::from("\t"))));
        assert!(is_value_valid("Ja"));
    }

    #[test]
    fn test_false_is_still_valid() {
        assert!(is_value_valid(&false));
        assert!(is_value_valid(&Some(false)));
    }
}
