use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use vela_source::{SourceLocation, SourceManager};

static DIR_COUNTER: AtomicU32 = AtomicU32::new(0);

// A unique scratch directory per test, cleaned up on drop.
struct Scratch {
    root: PathBuf,
}

impl Scratch {
    fn new() -> Self {
        let root = std::env::temp_dir().join(format!(
            "vela-source-test-{}-{}",
            std::process::id(),
            DIR_COUNTER.fetch_add(1, Ordering::Relaxed),
        ));
        std::fs::create_dir_all(&root).expect("create scratch dir");
        Self { root }
    }

    fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, contents).expect("write scratch file");
        path
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

#[test]
fn read_source_loads_file() {
    let scratch = Scratch::new();
    let path = scratch.write("top.sv", "module m; endmodule\n");

    let mut sm = SourceManager::new();
    let buf = sm.read_source(&path).expect("read source");
    assert_eq!(&*buf.text, "module m; endmodule\n");
    assert_eq!(sm.get_raw_file_name(buf.id), "top.sv");
    assert!(sm.get_included_from(buf.id).is_none());
}

#[test]
fn read_source_missing_file_is_an_error() {
    let scratch = Scratch::new();
    let mut sm = SourceManager::new();
    assert!(sm.read_source(&scratch.root.join("nope.sv")).is_err());
}

#[test]
fn same_file_loads_bytes_once() {
    let scratch = Scratch::new();
    let top = scratch.write("top.sv", "x\n");
    scratch.write("inc.svh", "shared\n");
    let mut sm = SourceManager::new();
    sm.add_user_directory(&scratch.root);

    let top_buf = sm.read_source(&top).expect("read source");
    let from_a = SourceLocation::new(top_buf.id, 0u32);
    let from_b = SourceLocation::new(top_buf.id, 1u32);

    let first = sm.read_header("inc.svh", from_a, false).expect("resolve");
    let second = sm.read_header("inc.svh", from_b, false).expect("resolve");

    // Distinct buffer entries record distinct include sites, but the
    // backing text is shared.
    assert_ne!(first.id, second.id);
    assert!(Arc::ptr_eq(&first.text, &second.text));
    assert_eq!(sm.get_included_from(first.id), Some(from_a));
    assert_eq!(sm.get_included_from(second.id), Some(from_b));
}

#[test]
fn quoted_include_prefers_including_directory() {
    let scratch = Scratch::new();
    let top = scratch.write("sub/top.sv", "x\n");
    scratch.write("sub/inc.svh", "local\n");
    scratch.write("shared/inc.svh", "shared\n");

    let mut sm = SourceManager::new();
    sm.add_user_directory(scratch.root.join("shared"));

    let top_buf = sm.read_source(&top).expect("read source");
    let site = SourceLocation::new(top_buf.id, 0u32);

    let buf = sm.read_header("inc.svh", site, false).expect("resolve");
    assert_eq!(&*buf.text, "local\n");
}

#[test]
fn quoted_include_falls_back_to_user_directories() {
    let scratch = Scratch::new();
    let top = scratch.write("sub/top.sv", "x\n");
    scratch.write("shared/inc.svh", "shared\n");

    let mut sm = SourceManager::new();
    sm.add_user_directory(scratch.root.join("shared"));

    let top_buf = sm.read_source(&top).expect("read source");
    let site = SourceLocation::new(top_buf.id, 0u32);

    let buf = sm.read_header("inc.svh", site, false).expect("resolve");
    assert_eq!(&*buf.text, "shared\n");
}

#[test]
fn system_include_ignores_user_directories() {
    let scratch = Scratch::new();
    let top = scratch.write("top.sv", "x\n");
    scratch.write("user/only.svh", "user\n");
    scratch.write("sys/sys.svh", "sys\n");

    let mut sm = SourceManager::new();
    sm.add_user_directory(scratch.root.join("user"));
    sm.add_system_directory(scratch.root.join("sys"));

    let top_buf = sm.read_source(&top).expect("read source");
    let site = SourceLocation::new(top_buf.id, 0u32);

    assert!(sm.read_header("only.svh", site, true).is_none());
    let buf = sm.read_header("sys.svh", site, true).expect("resolve");
    assert_eq!(&*buf.text, "sys\n");
}

#[test]
fn unresolved_include_returns_none() {
    let scratch = Scratch::new();
    let top = scratch.write("top.sv", "x\n");
    let mut sm = SourceManager::new();
    let top_buf = sm.read_source(&top).expect("read source");
    let site = SourceLocation::new(top_buf.id, 0u32);
    assert!(sm.read_header("missing.svh", site, false).is_none());
}
