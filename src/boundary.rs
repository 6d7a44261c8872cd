//! Lifecycle core of the view boundary.
//!
//! ARCHITECTURE
//! ============
//! `ViewBoundary<T>` is the zero-output render-tree node expressed without a
//! UI framework. The host drives it: the first `render` is the mount, every
//! later `render` is a re-render, `unmount` (or `Drop`) is removal from the
//! tree. Each render asks the tracking capability to attach; deduplication
//! belongs to the capability, not to the boundary.
//!
//! ERROR HANDLING
//! ==============
//! The boundary defines no errors. Whatever `attach` returns is handed back
//! to the host unmodified, and a failed attach leaves the boundary mounted so
//! the matching detach still happens.

#[cfg(test)]
#[path = "boundary_test.rs"]
mod boundary_test;

/// The "attach navigation tracking" capability consumed by the boundary.
///
/// `attach` must be safe to call on every render and must not emit more than
/// one signal per distinct navigation state. `detach` releases whatever the
/// first `attach` acquired and must be idempotent.
pub trait NavigationTracking {
    type Error;

    fn attach(&mut self) -> Result<(), Self::Error>;
    fn detach(&mut self);
}

/// Render result of the boundary: contributes nothing to the visual tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Empty;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Unmounted,
    Mounted,
}

pub struct ViewBoundary<T: NavigationTracking> {
    tracking: T,
    phase: Phase,
}

impl<T: NavigationTracking> ViewBoundary<T> {
    pub fn new(tracking: T) -> Self {
        Self {
            tracking,
            phase: Phase::Unmounted,
        }
    }

    /// Run one render pass.
    ///
    /// The first pass mounts the boundary. Every pass requests exactly one
    /// attachment and yields [`Empty`] unless the attachment itself failed.
    pub fn render(&mut self) -> Result<Empty, T::Error> {
        if self.phase == Phase::Unmounted {
            self.phase = Phase::Mounted;
        }
        self.tracking.attach()?;
        Ok(Empty)
    }

    /// Remove the boundary from the tree, detaching the tracking effect.
    /// Does nothing when not mounted.
    pub fn unmount(&mut self) {
        if self.phase == Phase::Mounted {
            self.phase = Phase::Unmounted;
            self.tracking.detach();
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_mounted(&self) -> bool {
        self.phase == Phase::Mounted
    }

    pub fn tracking(&self) -> &T {
        &self.tracking
    }
}

impl<T: NavigationTracking> Drop for ViewBoundary<T> {
    fn drop(&mut self) {
        self.unmount();
    }
}
