/// Errors raised by buffer, camera, orientation and session operations.
///
/// Every variant describes caller misuse of deterministic geometry; none of
/// them is transient, so retrying the same call fails the same way.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PanoviewError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("not configured: {0}")]
    NotConfigured(&'static str),

    #[error(
        "rotation matrix is not orthonormal (|R^T R - I| = {orthogonality_error:.3e}, det = {determinant:.6})"
    )]
    InvalidOrientation {
        orthogonality_error: f64,
        determinant: f64,
    },

    #[error("channel count mismatch (source {source_channels}, destination {destination_channels})")]
    ChannelMismatch {
        source_channels: usize,
        destination_channels: usize,
    },

    #[error(
        "mapping table covers {map_width}x{map_height} -> {map_source_width}x{map_source_height}, \
         buffers are {dst_width}x{dst_height} <- {src_width}x{src_height}"
    )]
    ModelMismatch {
        map_width: usize,
        map_height: usize,
        map_source_width: usize,
        map_source_height: usize,
        dst_width: usize,
        dst_height: usize,
        src_width: usize,
        src_height: usize,
    },
}

impl PanoviewError {
    /// Shorthand for [`PanoviewError::InvalidParameter`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = PanoviewError> = std::result::Result<T, E>;
