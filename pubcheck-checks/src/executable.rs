//! Execute-permission check for installed binaries.

use std::os::unix::fs::PermissionsExt;

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tracing::{error, info};

use pubcheck_engine::Check;

use crate::files::find_files;

const EXEC_BITS: u32 = 0o111;

/// Everything installed under the binary directories must be executable.
pub struct ExecutableCheck {
    root: Utf8PathBuf,
}

impl ExecutableCheck {
    pub const NAME: &'static str = "executable";

    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn mode(&self, item: &Utf8Path) -> anyhow::Result<u32> {
        Ok(fs::metadata(self.root.join(item))?.permissions().mode())
    }
}

impl Check for ExecutableCheck {
    type Item = Utf8PathBuf;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn items(&mut self) -> anyhow::Result<Vec<Utf8PathBuf>> {
        find_files(&self.root, &["usr/bin/**/*", "usr/sbin/**/*"])
    }

    fn validate(&mut self, item: &Utf8PathBuf) -> anyhow::Result<bool> {
        Ok(self.mode(item)? & EXEC_BITS != 0)
    }

    fn show(&mut self, item: &Utf8PathBuf) {
        error!("{item} is not executable");
    }

    fn diff(&mut self, item: &Utf8PathBuf) {
        info!("{item} would be granted execute permission");
    }

    fn fix(&mut self, item: &Utf8PathBuf) -> anyhow::Result<()> {
        let mode = self.mode(item)?;
        fs::set_permissions(
            self.root.join(item),
            std::fs::Permissions::from_mode(mode | EXEC_BITS),
        )?;
        info!("{item} is now executable");
        Ok(())
    }
}
