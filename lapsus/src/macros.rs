//! Construction macros and per-kind constructors

use crate::{Error, Factory, Kind};
use std::borrow::Cow;

/// Create an [`Error`](crate::Error) from a format string.
///
/// The identity comes from the format string, not the rendered text, so
/// two errors from the same invocation site template compare equal even
/// when their arguments differ.
///
/// ```rust
/// use lapsus::{error, is, Kind};
///
/// let a = error!(Kind::NotFound, "user {} not found", 1);
/// let b = error!(Kind::NotFound, "user {} not found", 2);
///
/// assert_eq!(a.message(), "user 1 not found");
/// assert!(is(&a, &b));
/// ```
#[macro_export]
macro_rules! error {
    ($kind:expr, $template:literal $($args:tt)*) => {
        $crate::Error::from_template($kind, $template, ::std::format!($template $($args)*))
    };
}

macro_rules! kind_constructors {
    ($($kind:ident => $name:ident),* $(,)?) => {
        impl Error {
            $(
                #[doc = concat!("Create a `", stringify!($kind), "` error.")]
                #[track_caller]
                pub fn $name(message: impl Into<String>) -> Self {
                    Self::new(Kind::$kind, message)
                }
            )*
        }

        impl Factory {
            $(
                #[doc = concat!("Create a factory of user-friendly `", stringify!($kind), "` errors.")]
                pub fn $name(template: impl Into<Cow<'static, str>>) -> Self {
                    Self::new(Kind::$kind, template)
                }
            )*
        }
    };
}

kind_constructors! {
    Authentication => authentication,
    Authorization => authorization,
    BadRequest => bad_request,
    Validation => validation,
    NotFound => not_found,
    AlreadyExists => already_exists,
    LimitExceeded => limit_exceeded,
    Inconsistent => inconsistent,
    Persistence => persistence,
    Infrastructure => infrastructure,
    ThirdParties => third_parties,
    Timeout => timeout,
}
