use std::{fs, path::Path, process::Command};

fn fwcombine(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fwcombine"));
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("FWCOMBINE_CONFIG")
        .env_remove("FWCOMBINE_BOOTLOADER")
        .env_remove("FWCOMBINE_MAIN")
        .env_remove("FWCOMBINE_OUTPUT")
        .env_remove("FWCOMBINE_BASE_OFFSET")
        .env_remove("FWCOMBINE_FILL_BYTE");
    cmd
}

#[test]
fn flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("build")).unwrap();
    fs::write(dir.path().join("build/bootloader.bin"), [0xAAu8; 10]).unwrap();
    fs::write(dir.path().join("build/main.bin"), [0xBBu8; 5]).unwrap();
    fs::write(
        dir.path().join("fwcombine.toml"),
        "bootloader = \"build/bootloader.bin\"\n\
         main = \"build/main.bin\"\n\
         output = \"combined/firmware.bin\"\n\
         base_offset = 0x10000\n",
    )
    .unwrap();

    let out = fwcombine(dir.path())
        .args(&["--base-offset", "0x14", "--fill-byte", "0"])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let output = Path::new("./combined/firmware.bin");
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        format!("Combined firmware saved to {}\n", output.display())
    );
    let data = fs::read(dir.path().join(output)).unwrap();
    let mut expected = vec![0xAAu8; 10];
    expected.extend(vec![0x00; 10]);
    expected.extend(vec![0xBB; 5]);
    assert_eq!(data, expected);
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.bin"), [0xBBu8; 5]).unwrap();

    let out = fwcombine(dir.path())
        .args(&["-b", "boot.bin", "-m", "main.bin", "-o", "out/firmware.bin"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("boot.bin"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn missing_output_setting_fails() {
    let dir = tempfile::tempdir().unwrap();

    let out = fwcombine(dir.path())
        .args(&["-b", "boot.bin", "-m", "main.bin"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no output path given"));
}

fn small_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bootloader.bin"), [0xAAu8; 2]).unwrap();
    fs::write(dir.path().join("main.bin"), [0xBBu8; 2]).unwrap();
    fs::write(
        dir.path().join("fwcombine.toml"),
        "bootloader = \"bootloader.bin\"\n\
         main = \"main.bin\"\n\
         output = \"from-config.bin\"\n\
         base_offset = 8\n",
    )
    .unwrap();
    dir
}

#[test]
fn env_overrides_config_file() {
    let dir = small_project();

    let out = fwcombine(dir.path())
        .env("FWCOMBINE_BASE_OFFSET", "4")
        .env("FWCOMBINE_OUTPUT", "from-env.bin")
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    assert!(!dir.path().join("from-config.bin").exists());
    assert_eq!(
        fs::read(dir.path().join("from-env.bin")).unwrap(),
        [0xAA, 0xAA, 0xFF, 0xFF, 0xBB, 0xBB]
    );
}

#[test]
fn flag_overrides_env() {
    let dir = small_project();

    let out = fwcombine(dir.path())
        .env("FWCOMBINE_BASE_OFFSET", "4")
        .env("FWCOMBINE_FILL_BYTE", "0x11")
        .args(&["--base-offset", "0x3", "--fill-byte", "0x22"])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    assert_eq!(
        fs::read(dir.path().join("from-config.bin")).unwrap(),
        [0xAA, 0xAA, 0x22, 0xBB, 0xBB]
    );
}
