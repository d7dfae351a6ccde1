//! Reconciler tests through the public library API.
#![cfg(unix)]

use std::cell::RefCell;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use solink::link::{
    DirectOps, LinkOps, LinkOutcome, ReconcileOptions, Reconciler, Resolution, SkipReason,
};
use solink::ui::{MockUI, PathDisplay};
use tempfile::TempDir;

/// Performs real operations and records each one.
#[derive(Default)]
struct Recording {
    calls: RefCell<Vec<String>>,
}

impl LinkOps for Recording {
    fn symlink(&self, target: &Path, link: &Path) -> solink::Result<()> {
        self.calls.borrow_mut().push(format!(
            "ln {} {}",
            file_name(target),
            file_name(link)
        ));
        DirectOps.symlink(target, link)
    }

    fn remove(&self, link: &Path) -> solink::Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("rm {}", file_name(link)));
        DirectOps.remove(link)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

struct Layout {
    temp: TempDir,
}

impl Layout {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("tensorrt_libs")).unwrap();
        fs::create_dir_all(temp.path().join("nvidia/cudnn/lib")).unwrap();
        Self { temp }
    }

    fn trt(&self) -> PathBuf {
        self.temp.path().join("tensorrt_libs")
    }

    fn cudnn(&self) -> PathBuf {
        self.temp.path().join("nvidia/cudnn/lib")
    }

    fn options(&self) -> ReconcileOptions {
        ReconcileOptions {
            check_version: false,
            fallback: Some(self.trt()),
            dry_run: false,
        }
    }

    fn paths(&self) -> PathDisplay {
        PathDisplay::relative_to(self.temp.path())
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn dangling_link_is_replaced_not_left_dangling() {
    let layout = Layout::new();
    fs::write(layout.trt().join("libnvinfer.so.8.6.1"), b"").unwrap();
    symlink("/gone/libnvinfer.so.8", layout.trt().join("libnvinfer.so.8")).unwrap();

    let ops = Recording::default();
    let reconciler = Reconciler::new(&ops, layout.options(), layout.paths());
    let mut ui = MockUI::new();
    let report = reconciler.reconcile(&names(&["libnvinfer.so.8"]), &layout.trt(), &mut ui);

    assert!(matches!(report.entries[0].outcome, LinkOutcome::Recreated(_)));
    assert!(layout.trt().join("libnvinfer.so.8").exists());
    assert_eq!(
        *ops.calls.borrow(),
        ["rm libnvinfer.so.8", "ln libnvinfer.so.8.6.1 libnvinfer.so.8"]
    );
    assert!(ui.has_warning("Broken symlink found: tensorrt_libs/libnvinfer.so.8"));
}

#[test]
fn stale_link_is_recreated() {
    let layout = Layout::new();
    fs::write(layout.cudnn().join("libnvinfer.so.8.6.1"), b"").unwrap();
    fs::write(layout.cudnn().join("other.so"), b"").unwrap();
    symlink(
        layout.cudnn().join("other.so"),
        layout.cudnn().join("libnvinfer.so.8"),
    )
    .unwrap();

    let ops = Recording::default();
    let reconciler = Reconciler::new(&ops, layout.options(), layout.paths());
    let mut ui = MockUI::new();
    let report = reconciler.reconcile(&names(&["libnvinfer.so.8"]), &layout.cudnn(), &mut ui);

    assert!(matches!(report.entries[0].outcome, LinkOutcome::Recreated(_)));
    assert_eq!(
        fs::read_link(layout.cudnn().join("libnvinfer.so.8")).unwrap(),
        layout.cudnn().join("libnvinfer.so.8.6.1")
    );
    assert!(ui.has_warning("Symlink exists but is incorrect"));
}

#[test]
fn link_into_fallback_is_accepted() {
    let layout = Layout::new();
    fs::write(layout.trt().join("libnvinfer.so.7"), b"").unwrap();
    fs::write(layout.cudnn().join("libnvinfer.so.8.6.1"), b"").unwrap();
    symlink(
        layout.trt().join("libnvinfer.so.7"),
        layout.cudnn().join("libnvinfer.so.8"),
    )
    .unwrap();

    let ops = Recording::default();
    let reconciler = Reconciler::new(&ops, layout.options(), layout.paths());
    let mut ui = MockUI::new();
    let report = reconciler.reconcile(&names(&["libnvinfer.so.8"]), &layout.cudnn(), &mut ui);

    assert!(matches!(
        report.entries[0].outcome,
        LinkOutcome::AcceptedFallback(_)
    ));
    assert!(ops.calls.borrow().is_empty());
}

#[test]
fn malformed_requirement_mutates_nothing() {
    let layout = Layout::new();

    let ops = Recording::default();
    let reconciler = Reconciler::new(&ops, layout.options(), layout.paths());
    let mut ui = MockUI::new();
    let report = reconciler.reconcile(&names(&["libnvinfer.so"]), &layout.trt(), &mut ui);

    assert_eq!(
        report.entries[0].outcome,
        LinkOutcome::Skipped(SkipReason::MalformedName)
    );
    assert_eq!(report.entries[0].resolution, None);
    assert!(ops.calls.borrow().is_empty());
    assert!(ui.has_error("Could not parse library format: libnvinfer.so"));
}

#[test]
fn failures_are_isolated_per_requirement() {
    let layout = Layout::new();
    fs::write(layout.trt().join("libnvinfer.so.8.6.1"), b"").unwrap();

    let ops = Recording::default();
    let options = ReconcileOptions {
        fallback: None,
        ..layout.options()
    };
    let reconciler = Reconciler::new(&ops, options, layout.paths());
    let mut ui = MockUI::new();
    let report = reconciler.reconcile(
        &names(&["bogus", "libnvinfer_plugin.so.8", "libnvinfer.so.8"]),
        &layout.trt(),
        &mut ui,
    );

    assert_eq!(report.entries.len(), 3);
    assert_eq!(
        report.entries[1].resolution,
        Some(Resolution::NotFound)
    );
    assert!(matches!(report.entries[2].outcome, LinkOutcome::Created(_)));
    assert_eq!(report.created().len(), 1);
    assert!(report.has_problems());
}
