//! Integration tests for inventory reconciliation.
//!
//! A shell script stands in for `vmrun`, VMX files are JSON documents read by
//! a mock translator, and `vmware.log` files sit next to them in a temp
//! directory.

#![cfg(unix)]

use std::collections::HashSet;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use vmwd_core::{
    Capabilities, ConfigTranslator, DomainDef, DomainState, Driver, DriverConfig, Flavor,
    GraphicsDef, GraphicsType, Result, StateReason, VmwdError,
};

/// Mock translator: "VMX" files hold a JSON-encoded `DomainDef`.
struct JsonTranslator;

impl ConfigTranslator for JsonTranslator {
    fn parse(&self, vmx: &[u8]) -> Result<DomainDef> {
        serde_json::from_slice(vmx).map_err(|e| VmwdError::Internal(e.to_string()))
    }

    fn format(&self, def: &DomainDef) -> Result<Vec<u8>> {
        serde_json::to_vec(def).map_err(|e| VmwdError::Internal(e.to_string()))
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// Temp directory with a fake `vmrun` and a place for VM directories.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self { dir: TempDir::new().expect("Failed to create temp directory") }
    }

    /// Install a `vmrun` that prints `listing` for `-T ws list` and fails otherwise.
    fn vmrun(&self, listing: &str) -> PathBuf {
        let listing_path = self.dir.path().join("listing.txt");
        std::fs::write(&listing_path, listing).unwrap();

        let script = format!(
            "#!/bin/sh\n\
             [ \"$1\" = \"-T\" ] && [ \"$2\" = \"ws\" ] && [ \"$3\" = \"list\" ] || exit 2\n\
             cat '{}'\n",
            listing_path.display()
        );
        self.script("vmrun", &script)
    }

    fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Create `<dir>/<name>/<name>.vmx` and, if given, its `vmware.log` with `pid`.
    fn vm(&self, name: &str, graphics: &[GraphicsType], pid: Option<i32>) -> PathBuf {
        let vm_dir = self.dir.path().join(name);
        std::fs::create_dir_all(&vm_dir).unwrap();

        let def = DomainDef {
            graphics: graphics.iter().copied().map(GraphicsDef::new).collect(),
            ..DomainDef::new(name)
        };
        let vmx = vm_dir.join(format!("{name}.vmx"));
        std::fs::write(&vmx, serde_json::to_vec(&def).unwrap()).unwrap();

        if let Some(pid) = pid {
            std::fs::write(
                vm_dir.join("vmware.log"),
                format!(
                    "2020-05-26T10:12:36.384+02:00| vmx| I125: Log for VMware Workstation pid={pid} version=15.5.6 build=build-16341506 option=Release\n"
                ),
            )
            .unwrap();
        }
        vmx
    }

    fn driver(&self, vmrun: &Path) -> Driver {
        let config = DriverConfig {
            vmrun_path: vmrun.to_path_buf(),
            flavor: Flavor::Workstation,
            ..Default::default()
        };
        Driver::with_capabilities(
            config,
            Arc::new(JsonTranslator),
            Capabilities::for_host("x86_64", &HashSet::new()),
        )
        .expect("Failed to create driver")
    }
}

fn listing(paths: &[&Path]) -> String {
    let mut out = format!("Total running VMs: {}\n", paths.len());
    for path in paths {
        out.push_str(&format!("{}\n", path.display()));
    }
    out
}

#[tokio::test]
async fn test_reconcile_registers_running_vms() {
    let fx = Fixture::new();
    let headless = fx.vm("headless", &[], Some(4321));
    let desktop = fx.vm("desktop", &[GraphicsType::Desktop], Some(5678));
    let vnc = fx.vm("vnc", &[GraphicsType::Vnc], Some(9012));

    let driver = fx.driver(&fx.vmrun(&listing(&[&headless, &desktop, &vnc])));
    let report = driver.reconcile().await.expect("Reconciliation failed");

    assert_eq!(report.domains, ["headless", "desktop", "vnc"]);
    assert_eq!(driver.registry().len().await, 3);

    let expected = [
        ("headless", &headless, 4321, true),
        ("desktop", &desktop, 5678, true),
        ("vnc", &vnc, 9012, false),
    ];
    for (name, vmx, pid, gui) in expected {
        let handle = driver.registry().get(name).await.expect("domain not registered");
        let obj = handle.lock().await;

        assert_eq!(obj.def.id, Some(pid), "{name}");
        assert_eq!(obj.private.vmx_path.as_deref(), Some(vmx.as_path()), "{name}");
        assert_eq!(obj.private.gui, gui, "{name}");
        assert_eq!(obj.state, DomainState::Running);
        assert_eq!(obj.reason, StateReason::Unknown);
        assert!(obj.persistent);
    }
}

#[tokio::test]
async fn test_reconcile_skips_noise_lines() {
    let fx = Fixture::new();
    let vm = fx.vm("only", &[], Some(100));

    let output = format!("Total running VMs: 1\n\nwarning: something\n{}\n", vm.display());
    let driver = fx.driver(&fx.vmrun(&output));

    let report = driver.reconcile().await.unwrap();
    assert_eq!(report.running(), 1);
    assert!(driver.registry().find_by_id(100).await.is_some());
}

#[tokio::test]
async fn test_reconcile_with_nothing_running() {
    let fx = Fixture::new();
    let driver = fx.driver(&fx.vmrun("Total running VMs: 0\n"));

    let report = driver.reconcile().await.unwrap();
    assert_eq!(report.running(), 0);
    assert!(driver.registry().is_empty().await);
}

#[tokio::test]
async fn test_reconcile_twice_keeps_one_record_per_vm() {
    let fx = Fixture::new();
    let a = fx.vm("a", &[], Some(1));
    let b = fx.vm("b", &[], Some(2));
    let driver = fx.driver(&fx.vmrun(&listing(&[&a, &b])));

    driver.reconcile().await.unwrap();
    driver.reconcile().await.unwrap();

    assert_eq!(driver.registry().len().await, 2);
}

#[tokio::test]
async fn test_translator_failure_aborts_without_rollback() {
    let fx = Fixture::new();
    let good = fx.vm("good", &[], Some(11));
    let bad = fx.dir.path().join("bad.vmx");
    std::fs::write(&bad, "config.version = \"8\"\n").unwrap();
    let never = fx.vm("never", &[], Some(12));

    let driver = fx.driver(&fx.vmrun(&listing(&[&good, &bad, &never])));
    let err = driver.reconcile().await.unwrap_err();

    match err {
        VmwdError::ConfigParse { path, .. } => assert_eq!(path, bad),
        other => panic!("unexpected error: {other}"),
    }

    // Registered before the failure, so it stays; nothing after it is loaded.
    assert!(driver.registry().get("good").await.is_some());
    assert!(driver.registry().get("never").await.is_none());
    assert_eq!(driver.registry().len().await, 1);
}

#[tokio::test]
async fn test_missing_log_fails_pass_but_keeps_domain() {
    let fx = Fixture::new();
    let vm = fx.vm("nolog", &[], None);
    let driver = fx.driver(&fx.vmrun(&listing(&[&vm])));

    let err = driver.reconcile().await.unwrap_err();
    assert!(matches!(err, VmwdError::LogNotFound { .. }));

    let handle = driver.registry().get("nolog").await.unwrap();
    let obj = handle.lock().await;
    assert_eq!(obj.def.id, None);
    assert_eq!(obj.private.vmx_path.as_deref(), Some(vm.as_path()));
}

#[tokio::test]
async fn test_malformed_log_fails_pass() {
    let fx = Fixture::new();
    let vm = fx.vm("garbled", &[], None);
    std::fs::write(vm.with_file_name("vmware.log"), "Log for VMware Workstation\n").unwrap();

    let driver = fx.driver(&fx.vmrun(&listing(&[&vm])));
    let err = driver.reconcile().await.unwrap_err();
    assert!(matches!(err, VmwdError::MalformedLog { .. }));
}

#[tokio::test]
async fn test_oversized_vmx_fails_pass() {
    let fx = Fixture::new();
    let big = fx.dir.path().join("big.vmx");
    std::fs::write(&big, vec![b'#'; 10_001]).unwrap();

    let driver = fx.driver(&fx.vmrun(&listing(&[&big])));
    let err = driver.reconcile().await.unwrap_err();
    assert!(matches!(err, VmwdError::SizeExceeded { limit: 10_000, .. }));
    assert!(driver.registry().is_empty().await);
}

#[tokio::test]
async fn test_listed_vmx_missing_fails_pass() {
    let fx = Fixture::new();
    let gone = fx.dir.path().join("gone/gone.vmx");

    let driver = fx.driver(&fx.vmrun(&listing(&[&gone])));
    let err = driver.reconcile().await.unwrap_err();
    assert!(matches!(err, VmwdError::Io { .. }));
}

#[tokio::test]
async fn test_vmrun_failure_fails_pass() {
    let fx = Fixture::new();
    let vmrun =
        fx.script("vmrun", "#!/bin/sh\necho 'Error: Unable to connect to host.' >&2\nexit 255\n");
    let driver = fx.driver(&vmrun);

    let err = driver.reconcile().await.unwrap_err();
    match err {
        VmwdError::ExternalTool { reason, .. } => assert!(reason.contains("Unable to connect")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(driver.registry().is_empty().await);
}

#[tokio::test]
async fn test_failed_repass_keeps_prior_running_state() {
    let fx = Fixture::new();
    let vm = fx.vm("steady", &[GraphicsType::Desktop], Some(4321));
    let driver = fx.driver(&fx.vmrun(&listing(&[&vm])));

    driver.reconcile().await.unwrap();

    std::fs::remove_file(vm.with_file_name("vmware.log")).unwrap();
    let err = driver.reconcile().await.unwrap_err();
    assert!(matches!(err, VmwdError::LogNotFound { .. }));

    let handle = driver.registry().get("steady").await.unwrap();
    let obj = handle.lock().await;
    assert_eq!(obj.state, DomainState::Running);
    assert_eq!(obj.def.id, Some(4321));
    assert!(obj.persistent);
    assert_eq!(obj.private.vmx_path.as_deref(), Some(vm.as_path()));
    assert!(obj.private.gui);
}

#[tokio::test]
async fn test_duplicate_domain_name_fails_pass() {
    let fx = Fixture::new();
    let first = fx.vm("dup", &[], Some(1111));

    let other_dir = fx.dir.path().join("other");
    std::fs::create_dir_all(&other_dir).unwrap();
    let second = other_dir.join("dup.vmx");
    std::fs::write(&second, serde_json::to_vec(&DomainDef::new("dup")).unwrap()).unwrap();
    std::fs::write(
        other_dir.join("vmware.log"),
        "2020-05-26T10:12:36.384+02:00| vmx| I125: Log for VMware Workstation pid=2222 version=15.5.6 build=build-16341506 option=Release\n",
    )
    .unwrap();

    let driver = fx.driver(&fx.vmrun(&listing(&[&first, &second])));
    let err = driver.reconcile().await.unwrap_err();

    match err {
        VmwdError::DomainExists { name, existing, path } => {
            assert_eq!(name, "dup");
            assert_eq!(existing, first);
            assert_eq!(path, second);
        }
        other => panic!("unexpected error: {other}"),
    }

    // The first VM's record is untouched by the second listing.
    assert_eq!(driver.registry().len().await, 1);
    let handle = driver.registry().get("dup").await.unwrap();
    let obj = handle.lock().await;
    assert_eq!(obj.def.id, Some(1111));
    assert_eq!(obj.private.vmx_path.as_deref(), Some(first.as_path()));
}
