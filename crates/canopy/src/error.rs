//! Viewer errors.

use crate::sink::Stage;
use canopy_core::{LoadError, TreeError};
use canopy_layout::{LayoutError, LayoutKind};
use thiserror::Error;

/// Errors surfaced by [`crate::Viewer`].
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The inventory could not be loaded; the previous tree is kept.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The layout could not be computed; the previous frame is kept.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// An interaction named a node that does not exist.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Nothing has been loaded yet.
    #[error("no inventory loaded")]
    NoData,

    /// Zoom needs a sunburst on screen.
    #[error("zoom is only available on the sunburst, current layout is {0}")]
    ZoomUnavailable(LayoutKind),
}

impl ViewerError {
    /// The stage a diagnostic for this error belongs to.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Load(_) => Stage::Load,
            Self::Layout(_) | Self::NoData => Stage::Layout,
            Self::Tree(_) | Self::ZoomUnavailable(_) => Stage::Interaction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_error_display_and_stage() {
        let err = ViewerError::from(LoadError::NoRoot);
        assert_eq!(err.to_string(), "no root record (every row names a parent)");
        assert_eq!(err.stage(), Stage::Load);

        let err = ViewerError::from(LayoutError::UnknownLayout("pie".into()));
        assert_eq!(err.to_string(), "unknown layout: pie");
        assert_eq!(err.stage(), Stage::Layout);

        let err = ViewerError::ZoomUnavailable(LayoutKind::Treemap);
        assert_eq!(
            err.to_string(),
            "zoom is only available on the sunburst, current layout is treemap"
        );
        assert_eq!(err.stage(), Stage::Interaction);
    }
}
