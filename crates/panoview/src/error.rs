use crate::{ConfigError, PanoviewError};

/// Everything a load, render and save round trip can fail with.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Panoview(#[from] PanoviewError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[cfg(feature = "image")]
    #[error(transparent)]
    Convert(#[from] crate::convert::ConvertError),

    #[cfg(feature = "image")]
    #[error(transparent)]
    Image(#[from] ::image::ImageError),
}
