//! Filesystem operations used to place links.
//!
//! [`LinkOps`] is the seam between the reconciler and the filesystem.
//! [`DirectOps`] makes the syscalls itself, [`ElevatedOps`] goes through an
//! external privilege-escalation command, and [`EscalatingOps`] tries the
//! first and falls back to the second only when the first is denied.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{Result, SolinkError};
use crate::shell::{display_command, run_captured};

/// Create and remove symlinks.
pub trait LinkOps {
    /// Create a symlink at `link` pointing to `target`.
    fn symlink(&self, target: &Path, link: &Path) -> Result<()>;

    /// Remove the link at `link`.
    fn remove(&self, link: &Path) -> Result<()>;

    /// Whether `path` exists only as a link this instance has planned.
    fn is_planned(&self, _path: &Path) -> bool {
        false
    }
}

/// Plain syscalls as the current user.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectOps;

impl LinkOps for DirectOps {
    fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        #[cfg(unix)]
        std::os::unix::fs::symlink(target, link)?;
        #[cfg(windows)]
        std::os::windows::fs::symlink_file(target, link)?;
        Ok(())
    }

    fn remove(&self, link: &Path) -> Result<()> {
        std::fs::remove_file(link)?;
        Ok(())
    }
}

/// `ln -s` and `rm` run through an escalation program such as `sudo`.
#[derive(Debug, Clone)]
pub struct ElevatedOps {
    program: String,
}

impl ElevatedOps {
    /// Escalate with the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: Vec<std::ffi::OsString>) -> Result<()> {
        let command = display_command(&self.program, &args);
        let result = run_captured(&self.program, &args).map_err(|e| SolinkError::ElevationFailed {
            command: command.clone(),
            code: None,
            stderr: e.to_string(),
        })?;

        if result.success {
            Ok(())
        } else {
            Err(SolinkError::ElevationFailed {
                command,
                code: result.exit_code,
                stderr: result.stderr.trim().to_string(),
            })
        }
    }
}

impl Default for ElevatedOps {
    fn default() -> Self {
        Self::new("sudo")
    }
}

impl LinkOps for ElevatedOps {
    fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        let target = absolute(target)?;
        let link = absolute(link)?;
        self.run(vec![
            "ln".into(),
            "-s".into(),
            target.into_os_string(),
            link.into_os_string(),
        ])
    }

    fn remove(&self, link: &Path) -> Result<()> {
        self.run(vec!["rm".into(), link.as_os_str().to_owned()])
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}

/// Direct operation first, escalated operation on permission denial.
#[derive(Debug, Clone)]
pub struct EscalatingOps<D = DirectOps, E = ElevatedOps> {
    direct: D,
    elevated: Option<E>,
}

impl<D: LinkOps, E: LinkOps> EscalatingOps<D, E> {
    /// Combine a direct and an elevated implementation.
    ///
    /// With `elevated` set to `None`, denials are returned unchanged.
    pub fn new(direct: D, elevated: Option<E>) -> Self {
        Self { direct, elevated }
    }

    fn escalate<F, G>(&self, what: &str, path: &Path, direct: F, elevated: G) -> Result<()>
    where
        F: FnOnce(&D) -> Result<()>,
        G: FnOnce(&E) -> Result<()>,
    {
        match direct(&self.direct) {
            Err(e) if e.is_permission_denied() => match &self.elevated {
                Some(ops) => {
                    tracing::info!(
                        "Permission denied to {} {}, retrying with elevation",
                        what,
                        path.display()
                    );
                    elevated(ops)
                }
                None => Err(e),
            },
            other => other,
        }
    }
}

impl EscalatingOps {
    /// Direct syscalls with `program` as the escalation command.
    ///
    /// Escalation is disabled when `program` is empty or the process
    /// already runs as root.
    pub fn with_program(program: &str) -> Self {
        let elevated = if program.is_empty() || crate::shell::is_elevated() {
            None
        } else {
            Some(ElevatedOps::new(program))
        };
        Self::new(DirectOps, elevated)
    }
}

impl<D: LinkOps, E: LinkOps> LinkOps for EscalatingOps<D, E> {
    fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        self.escalate(
            "create",
            link,
            |d| d.symlink(target, link),
            |e| e.symlink(target, link),
        )
    }

    fn remove(&self, link: &Path) -> Result<()> {
        self.escalate("remove", link, |d| d.remove(link), |e| e.remove(link))
    }
}

/// Plans links without touching the filesystem; used for `--dry-run`.
///
/// Planned links count as existing for later requirements, so a fallback
/// into a directory repaired earlier in the same run is reported the same
/// way the real run would handle it.
#[derive(Debug, Default)]
pub struct DryRunOps {
    planned: RefCell<BTreeSet<PathBuf>>,
}

impl DryRunOps {
    /// Links planned so far, in path order.
    pub fn planned(&self) -> Vec<PathBuf> {
        self.planned.borrow().iter().cloned().collect()
    }
}

impl LinkOps for DryRunOps {
    fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        tracing::debug!("dry-run: ln -s {} {}", target.display(), link.display());
        self.planned.borrow_mut().insert(link.to_path_buf());
        Ok(())
    }

    fn remove(&self, link: &Path) -> Result<()> {
        tracing::debug!("dry-run: rm {}", link.display());
        self.planned.borrow_mut().remove(link);
        Ok(())
    }

    fn is_planned(&self, path: &Path) -> bool {
        self.planned.borrow().contains(path)
    }
}
