/// High-level response after a surface error.
///
/// Only `Fatal` ends the app; everything else is recovered by the next redraw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

impl SurfaceErrorAction {
    /// True when the current frame was dropped but the surface is still usable.
    #[inline]
    pub fn is_recoverable(self) -> bool {
        !matches!(self, SurfaceErrorAction::Fatal)
    }
}
