use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

use refasm::metadata::{
    method::{Method, MethodAccessFlags, MethodBody},
    module::Module,
    signatures::MethodSignature,
    typesystem::{CilType, TypeAttributes},
};

fn refasm(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_refasm"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_input(dir: &Path) -> PathBuf {
    let mut module = Module::new("Lib.dll");

    let mut api = CilType::new("Lib", "Api", TypeAttributes::PUBLIC);
    let mut run = Method::new(
        "Run",
        MethodAccessFlags::PUBLIC.bits(),
        MethodSignature::default(),
    );
    run.body = Some(MethodBody::from_code(vec![0x00, 0x00, 0x2A]));
    api.methods.push(run);
    module.types.push(api);
    module
        .types
        .push(CilType::new("Lib", "Impl", TypeAttributes::NOT_PUBLIC));

    let path = dir.join("Lib.dll");
    module.write_to(&path).unwrap();
    path
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn generates_default_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());

    let output = refasm(&[path_str(&input)]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Lib.dll -> Lib-reference.dll"));

    let module = Module::from_file(&dir.path().join("Lib-reference.dll")).unwrap();
    assert!(module.find_type("Lib.Impl").is_none());
    let body = module.find_type("Lib.Api").unwrap().methods[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(body.code, [0x14, 0x7A]);
}

#[test]
fn use_ret_and_explicit_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let target = dir.path().join("ref.dll");

    let output = refasm(&[path_str(&input), "-o", path_str(&target), "--use-ret"]);
    assert!(output.status.success());

    let module = Module::from_file(&target).unwrap();
    let body = module.find_type("Lib.Api").unwrap().methods[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(body.code, [0x2A]);
}

#[test]
fn existing_output_requires_force() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let target = dir.path().join("Lib-reference.dll");
    std::fs::write(&target, b"keep me").unwrap();

    let output = refasm(&[path_str(&input)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--force"));
    assert_eq!(std::fs::read(&target).unwrap(), b"keep me");

    let output = refasm(&[path_str(&input), "--force"]);
    assert!(output.status.success());
    assert!(Module::from_file(&target).is_ok());
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("Nope.dll");

    let output = refasm(&[path_str(&missing)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn argument_errors_exit_with_one() {
    assert_eq!(refasm(&[]).status.code(), Some(1));
    assert_eq!(refasm(&["Lib.dll", "--unknown"]).status.code(), Some(1));
    assert_eq!(refasm(&["--help"]).status.code(), Some(0));
    assert_eq!(refasm(&["--version"]).status.code(), Some(0));
}
