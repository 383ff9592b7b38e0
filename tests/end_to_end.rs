mod common;

use anyhow::Result;
use common::{Fixture, reported};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_reports_only_unaccounted_file() -> Result<()> {
    let fx = Fixture::new()?;
    let f1 = fx.file("x/f1.bin", "first")?;
    fx.file("x/f2.bin", "second")?;
    fx.file("x/f1.bin.xz", "compressed first")?;
    let manifest = fx.manifest("burn.md5", &[(f1.as_str(), "x/f1.bin")])?;

    fx.command()?
        .arg("-m")
        .arg(&manifest)
        .assert()
        .success()
        .stdout("x/f2.bin\n")
        .stderr(predicate::str::contains("Loaded 1 md5s"))
        .stderr(predicate::str::contains(
            "3 candidates, 1 new, 2 burnt by path, 0 burnt by digest, 0 ignored, 0 skipped",
        ));
    Ok(())
}

#[test]
fn test_ignore_prefix_hides_subtree() -> Result<()> {
    let fx = Fixture::new()?;
    fx.file("y/secret.txt", "secret")?;
    fx.file("z/keep.txt", "keep")?;
    let manifest = fx.manifest("burn.md5", &[])?;
    let ignore = fx.ignore(&["y/"])?;

    fx.command()?
        .arg("-m")
        .arg(&manifest)
        .arg("-i")
        .arg(&ignore)
        .assert()
        .success()
        .stdout("z/keep.txt\n");
    Ok(())
}

#[test]
fn test_renamed_copy_is_known_by_digest() -> Result<()> {
    let fx = Fixture::new()?;
    let digest = fx.file("moved/renamed.txt", "same bytes")?;
    let manifest = fx.manifest("burn.md5", &[(digest.as_str(), "original/name.txt")])?;

    fx.command()?
        .arg("-m")
        .arg(&manifest)
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("1 burnt by digest"));
    Ok(())
}

#[test]
fn test_compressed_manifest_entry_covers_plain_file() -> Result<()> {
    let fx = Fixture::new()?;
    fx.file("docs/report.txt", "plain")?;
    let zero = "0".repeat(32);
    let manifest = fx.manifest("burn.md5", &[(zero.as_str(), "docs/report.txt.xz")])?;

    let lines = reported(fx.command()?.arg("-m").arg(&manifest));
    assert!(lines.is_empty());
    Ok(())
}

#[test]
fn test_hidden_entries_need_flag() -> Result<()> {
    let fx = Fixture::new()?;
    fx.file(".dotfile", "a")?;
    fx.file(".cache/blob", "b")?;
    fx.file("visible.txt", "c")?;
    let manifest = fx.manifest("burn.md5", &[])?;

    let default = reported(fx.command()?.arg("-m").arg(&manifest));
    assert_eq!(default, vec!["visible.txt"]);

    let hidden = reported(fx.command()?.arg("-m").arg(&manifest).arg("-H"));
    assert_eq!(hidden, vec![".cache/blob", ".dotfile", "visible.txt"]);
    Ok(())
}

#[test]
fn test_worker_count_does_not_change_results() -> Result<()> {
    let fx = Fixture::new()?;
    let mut records = Vec::new();
    for i in 0..60 {
        let digest = fx.file(&format!("d{}/f{i}.dat", i % 5), &format!("content {i}"))?;
        if i % 3 == 0 {
            records.push((digest, format!("elsewhere/f{i}.dat")));
        }
    }
    let pairs: Vec<(&str, &str)> = records
        .iter()
        .map(|(d, p)| (d.as_str(), p.as_str()))
        .collect();
    let manifest = fx.manifest("burn.md5", &pairs)?;

    let baseline = reported(fx.command()?.arg("-m").arg(&manifest).args(["-t", "1"]));
    assert_eq!(baseline.len(), 40);
    for threads in ["0", "3", "16"] {
        let lines = reported(fx.command()?.arg("-m").arg(&manifest).args(["-t", threads]));
        assert_eq!(lines, baseline, "threads = {threads}");
    }
    Ok(())
}

#[test]
fn test_repeated_runs_are_identical() -> Result<()> {
    let fx = Fixture::new()?;
    fx.file("a.txt", "a")?;
    fx.file("b/c.txt", "c")?;
    let manifest = fx.manifest("burn.md5", &[])?;

    let first = reported(fx.command()?.arg("-m").arg(&manifest));
    let second = reported(fx.command()?.arg("-m").arg(&manifest));
    assert_eq!(first, second);
    assert_eq!(first, vec!["a.txt", "b/c.txt"]);
    Ok(())
}

#[test]
fn test_manifest_glob_and_repeat() -> Result<()> {
    let fx = Fixture::new()?;
    let a = fx.file("a.txt", "a")?;
    let b = fx.file("b.txt", "b")?;
    fx.file("c.txt", "c")?;
    fx.manifest("one.md5", &[(a.as_str(), "a.txt")])?;
    fx.manifest("two.md5", &[(b.as_str(), "b.txt")])?;

    let pattern = fx.path().join("*.md5");
    let lines = reported(fx.command()?.arg("-m").arg(&pattern));
    assert_eq!(lines, vec!["c.txt"]);

    let lines = reported(
        fx.command()?
            .arg("-m")
            .arg(fx.path().join("one.md5"))
            .arg("--md5")
            .arg(fx.path().join("two.md5")),
    );
    assert_eq!(lines, vec!["c.txt"]);
    Ok(())
}

#[test]
fn test_malformed_manifest_lines_are_skipped() -> Result<()> {
    let fx = Fixture::new()?;
    let digest = fx.file("kept.txt", "kept")?;
    fx.file("new.txt", "new")?;
    let manifest = fx.path().join("burn.md5");
    fs::write(&manifest, format!("not a manifest line\n{digest}  ./kept.txt\n"))?;

    fx.command()?
        .arg("-m")
        .arg(&manifest)
        .assert()
        .success()
        .stdout("new.txt\n")
        .stderr(predicate::str::contains("malformed"));
    Ok(())
}

#[test]
fn test_missing_manifest_fails() -> Result<()> {
    let fx = Fixture::new()?;
    fx.file("a.txt", "a")?;

    fx.command()?
        .arg("-m")
        .arg(fx.path().join("absent.md5"))
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("No manifest file matches"));
    Ok(())
}

#[test]
fn test_no_manifest_flag_fails() -> Result<()> {
    let fx = Fixture::new()?;

    fx.command()?
        .assert()
        .failure()
        .stderr(predicate::str::contains("No manifest given"));
    Ok(())
}

#[test]
fn test_missing_folder_fails() -> Result<()> {
    let fx = Fixture::new()?;
    let manifest = fx.manifest("burn.md5", &[])?;
    fs::remove_dir_all(&fx.root)?;

    fx.command()?
        .arg("-m")
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Folder does not exist"));
    Ok(())
}

#[test]
fn test_missing_ignore_file_fails() -> Result<()> {
    let fx = Fixture::new()?;
    let manifest = fx.manifest("burn.md5", &[])?;

    fx.command()?
        .arg("-m")
        .arg(&manifest)
        .arg("-i")
        .arg(fx.path().join("absent.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load ignore file"));
    Ok(())
}

#[test]
fn test_quiet_keeps_stderr_clean() -> Result<()> {
    let fx = Fixture::new()?;
    fx.file("a.txt", "a")?;
    let manifest = fx.manifest("burn.md5", &[])?;

    fx.command()?
        .arg("-q")
        .arg("-m")
        .arg(&manifest)
        .assert()
        .success()
        .stdout("a.txt\n")
        .stderr("");
    Ok(())
}

#[test]
fn test_config_file_sets_suffix() -> Result<()> {
    let fx = Fixture::new()?;
    fx.file("logs/app.log.gz", "zipped")?;
    let zero = "0".repeat(32);
    let manifest = fx.manifest("burn.md5", &[(zero.as_str(), "logs/app.log")])?;
    let config = fx.path().join("config.toml");
    fs::write(&config, "[scan]\ncompressed_suffix = \".gz\"\n")?;

    let with_config = reported(
        fx.command()?
            .arg("--config")
            .arg(&config)
            .arg("-m")
            .arg(&manifest),
    );
    assert!(with_config.is_empty());

    let without = reported(fx.command()?.arg("-m").arg(&manifest));
    assert_eq!(without, vec!["logs/app.log.gz"]);
    Ok(())
}

#[cfg(target_os = "linux")]
#[test]
fn test_default_config_location_is_read() -> Result<()> {
    let fx = Fixture::new()?;
    fx.file(".hidden", "h")?;
    let manifest = fx.manifest("burn.md5", &[])?;
    let config_dir = fx.path().join(".config/unburnt");
    fs::create_dir_all(&config_dir)?;
    fs::write(config_dir.join("config.toml"), "[scan]\ninclude_hidden = true\n")?;

    let lines = reported(fx.command()?.arg("-m").arg(&manifest));
    assert_eq!(lines, vec![".hidden"]);
    Ok(())
}

#[test]
fn test_invalid_config_fails() -> Result<()> {
    let fx = Fixture::new()?;
    let manifest = fx.manifest("burn.md5", &[])?;
    let config = fx.path().join("config.toml");
    fs::write(&config, "[performance]\nmmap_threshold = 0\n")?;

    fx.command()?
        .arg("--config")
        .arg(&config)
        .arg("-m")
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("mmap_threshold"));
    Ok(())
}

#[test]
fn test_xxh3_algorithm_matches_by_content() -> Result<()> {
    let fx = Fixture::new()?;
    fx.file("copy.bin", "payload")?;
    let digest = unburnt::digest::Xxh3Digester::digest_bytes(b"payload");
    let manifest = fx.manifest("burn.md5", &[(digest.as_str(), "original.bin")])?;

    let lines = reported(
        fx.command()?
            .args(["--algorithm", "xxh3"])
            .arg("-m")
            .arg(&manifest),
    );
    assert!(lines.is_empty());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_md5sum_tool_agrees_with_native() -> Result<()> {
    if which::which("md5sum").is_err() {
        return Ok(());
    }
    let fx = Fixture::new()?;
    let digest = fx.file("copy.txt", "shared")?;
    fx.file("fresh.txt", "fresh")?;
    let manifest = fx.manifest("burn.md5", &[(digest.as_str(), "orig.txt")])?;

    let lines = reported(
        fx.command()?
            .args(["--algorithm", "md5sum"])
            .arg("-m")
            .arg(&manifest),
    );
    assert_eq!(lines, vec!["fresh.txt"]);
    Ok(())
}

#[test]
fn test_completions() -> Result<()> {
    assert_cmd::Command::cargo_bin("unburnt")?
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unburnt"));
    Ok(())
}
