use super::{HostMode, HostResult, MeshHost};

/// Scoped access to a host's edit mode.
///
/// `acquire` switches the host into [`HostMode::Edit`] when it is not already
/// there and remembers the prior mode. The prior mode is restored by
/// [`EditModeGuard::release`], or by `Drop` on any path that skips it; a
/// failed restore during `Drop` can only be logged.
pub struct EditModeGuard<'a, H: MeshHost + ?Sized> {
    host: &'a mut H,
    restore: Option<HostMode>,
}

impl<'a, H: MeshHost + ?Sized> EditModeGuard<'a, H> {
    pub fn acquire(host: &'a mut H) -> HostResult<Self> {
        let prior = host.mode();
        let restore = if prior.is_editable() {
            None
        } else {
            host.set_mode(HostMode::Edit)?;
            log::debug!("[host] {} entered edit mode from {prior}", host.label());
            Some(prior)
        };
        Ok(Self { host, restore })
    }

    /// Whether this guard switched modes and will switch back.
    pub fn adjusted(&self) -> bool {
        self.restore.is_some()
    }

    pub fn host(&self) -> &H {
        &*self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut *self.host
    }

    pub fn release(mut self) -> HostResult<()> {
        match self.restore.take() {
            Some(prior) => {
                self.host.set_mode(prior)?;
                log::debug!("[host] {} restored {prior} mode", self.host.label());
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl<H: MeshHost + ?Sized> Drop for EditModeGuard<'_, H> {
    fn drop(&mut self) {
        if let Some(prior) = self.restore.take() {
            if let Err(err) = self.host.set_mode(prior) {
                log::error!(
                    "[host] failed to restore {prior} mode on {}: {err}",
                    self.host.label()
                );
            }
        }
    }
}
