use crate::element::Visibility;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The element a coordinator was asked to bind to no longer exists.
    #[error("element is gone; an animator needs a live element to bind to")]
    MissingElement,

    /// Hide visibility must be `Invisible` or `Gone`.
    #[error("illegal hide visibility {0:?}: Invisible or Gone required")]
    InvalidHideVisibility(Visibility),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
