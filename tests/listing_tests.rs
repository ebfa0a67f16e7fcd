use g_ls::app::{self, EXIT_INTERRUPTED};
use g_ls::config::{ListingRequest, Theme};
use g_ls::core::{EntryFilter, GitStatus, TimeType};
use g_ls::layout::json::JsonListing;
use g_ls::layout::{LayoutKind, TimeColumns};
use g_ls::utils::Interrupt;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::process::Command;
use std::time::{Duration, UNIX_EPOCH};
use tempfile::tempdir;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn run_listing(req: &ListingRequest) -> TestResult<(u8, String, String)> {
    let theme = Theme::default();
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = app::run(req, &theme, &mut out, &mut err)?;
    Ok((code, String::from_utf8(out)?, String::from_utf8(err)?))
}

fn request(root: &Path, layout: LayoutKind) -> ListingRequest {
    ListingRequest {
        paths: vec![root.to_path_buf()],
        layout,
        width: Some(80),
        ..ListingRequest::default()
    }
}

fn fixture() -> TestResult<tempfile::TempDir> {
    let dir = tempdir()?;
    fs::create_dir_all(dir.path().join("src/nested"))?;
    File::create(dir.path().join("src/main.rs"))?;
    File::create(dir.path().join("src/nested/deep.rs"))?;
    File::create(dir.path().join(".hidden"))?;
    let mut readme = File::create(dir.path().join("README.md"))?;
    writeln!(readme, "# fixture")?;
    Ok(dir)
}

#[test]
fn hidden_entries_need_all() -> TestResult {
    let dir = fixture()?;
    let mut req = request(dir.path(), LayoutKind::Oneline);

    let (code, out, _) = run_listing(&req)?;
    assert_eq!(code, 0);
    assert_eq!(out, "src\nREADME.md\n");

    req.filter = EntryFilter::new(true);
    let (_, out, _) = run_listing(&req)?;
    assert_eq!(out, "src\n.hidden\nREADME.md\n");
    Ok(())
}

#[test]
fn missing_argument_exits_with_two_and_lists_the_rest() -> TestResult {
    let dir = fixture()?;
    let mut req = request(dir.path(), LayoutKind::Oneline);
    req.paths = vec![dir.path().join("missing"), dir.path().join("README.md")];

    let (code, out, err) = run_listing(&req)?;
    assert_eq!(code, 2);
    assert!(out.contains("README.md"), "output was {out:?}");
    assert!(err.starts_with("g: cannot access"), "stderr was {err:?}");
    Ok(())
}

#[cfg(unix)]
#[test]
fn unreadable_subdirectory_exits_with_one() -> TestResult {
    use std::os::unix::fs::PermissionsExt;

    let dir = fixture()?;
    let locked = dir.path().join("src/nested");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;
    // root ignores permissions, nothing to check then
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
        return Ok(());
    }

    let mut req = request(dir.path(), LayoutKind::Oneline);
    req.recursion = Some(usize::MAX);
    let result = run_listing(&req);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;

    let (code, _, err) = result?;
    assert_eq!(code, 1);
    assert!(err.contains("nested"));
    Ok(())
}

#[test]
fn recursive_listing_prints_a_section_per_directory() -> TestResult {
    let dir = fixture()?;
    let mut req = request(dir.path(), LayoutKind::Oneline);
    req.recursion = Some(usize::MAX);

    let (_, out, _) = run_listing(&req)?;
    let root = dir.path().display().to_string();
    let expected = format!(
        "{root}:\nsrc\nREADME.md\n\n{root}/src:\nnested\nmain.rs\n\n{root}/src/nested:\ndeep.rs\n"
    );
    assert_eq!(out, expected);
    Ok(())
}

#[test]
fn tree_shows_the_hierarchy() -> TestResult {
    let dir = fixture()?;
    let mut req = request(dir.path(), LayoutKind::Tree);
    req.recursion = Some(usize::MAX);

    let (_, out, _) = run_listing(&req)?;
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], dir.path().display().to_string());
    assert_eq!(
        &lines[1..],
        [
            "├── src",
            "│   ├── nested",
            "│   │   ╰── deep.rs",
            "│   ╰── main.rs",
            "╰── README.md",
        ]
    );
    Ok(())
}

#[test]
fn tree_depth_limit() -> TestResult {
    let dir = fixture()?;
    let mut req = request(dir.path(), LayoutKind::Tree);
    req.recursion = Some(1);

    let (_, out, _) = run_listing(&req)?;
    assert_eq!(out.lines().count(), 3);
    Ok(())
}

#[test]
fn json_round_trips_entries() -> TestResult {
    let dir = fixture()?;
    let req = request(dir.path(), LayoutKind::Json);

    let (_, out, _) = run_listing(&req)?;
    let parsed: JsonListing = serde_json::from_str(&out)?;
    let tuples: Vec<(String, u64, String)> = parsed
        .entries
        .iter()
        .map(|e| (e.name.clone(), e.size, format!("{:?}", e.kind)))
        .collect();
    assert_eq!(
        tuples,
        vec![
            ("src".to_string(), parsed.entries[0].size, "Directory".to_string()),
            ("README.md".to_string(), 10, "File".to_string()),
        ]
    );
    assert!(parsed.errors.is_empty());
    Ok(())
}

#[test]
fn markdown_escapes_pipes() -> TestResult {
    let dir = tempdir()?;
    File::create(dir.path().join("a|b.txt"))?;
    let req = request(dir.path(), LayoutKind::Markdown);

    let (_, out, _) = run_listing(&req)?;
    assert!(out.contains("| a\\|b.txt |"), "output was {out:?}");
    Ok(())
}

#[test]
fn git_status_is_none_outside_a_repository() -> TestResult {
    let dir = fixture()?;
    let mut req = request(dir.path(), LayoutKind::Json);
    req.columns.git = true;

    let (code, out, _) = run_listing(&req)?;
    assert_eq!(code, 0);
    let parsed: JsonListing = serde_json::from_str(&out)?;
    // a temp dir nested in a checkout would make this meaningless
    let inside_repo = Command::new("git")
        .arg("-C")
        .arg(dir.path())
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .is_ok_and(|o| o.status.success());
    if !inside_repo {
        assert!(parsed.entries.iter().all(|e| e.git == GitStatus::None));
    }
    Ok(())
}

#[test]
fn git_status_inside_a_repository() -> TestResult {
    if which::which("git").is_err() {
        return Ok(());
    }
    let dir = fixture()?;
    let git = |args: &[&str]| {
        Command::new("git")
            .arg("-C")
            .arg(dir.path())
            .args(args)
            .output()
    };
    if !git(&["init", "-q"])?.status.success() {
        return Ok(());
    }
    fs::write(dir.path().join(".gitignore"), "*.log\n")?;
    File::create(dir.path().join("debug.log"))?;
    git(&["add", "README.md"])?;

    let mut req = request(dir.path(), LayoutKind::Json);
    req.columns.git = true;
    req.filter = EntryFilter::new(true);

    let (_, out, _) = run_listing(&req)?;
    let parsed: JsonListing = serde_json::from_str(&out)?;
    let status = |name: &str| {
        parsed
            .entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.git)
    };
    assert_eq!(status("README.md"), Some(GitStatus::Staged));
    assert_eq!(status("src"), Some(GitStatus::Untracked));
    assert_eq!(status("debug.log"), Some(GitStatus::Ignored));
    Ok(())
}

#[test]
fn file_and_directory_arguments_get_titles() -> TestResult {
    let dir = fixture()?;
    let mut req = request(dir.path(), LayoutKind::Oneline);
    req.paths = vec![dir.path().join("README.md"), dir.path().join("src")];

    let (_, out, _) = run_listing(&req)?;
    let readme = dir.path().join("README.md").display().to_string();
    let src = dir.path().join("src").display().to_string();
    assert_eq!(out, format!("{readme}\n\n{src}:\nnested\nmain.rs\n"));
    Ok(())
}

/// Output sink that raises the interrupt on the first write, like Ctrl-C right after
/// the listing starts.
struct TripWire {
    written: Vec<u8>,
    interrupt: Interrupt,
}

impl Write for TripWire {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.interrupt.trigger();
        self.written.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn interrupt_keeps_what_was_printed_and_exits_with_130() -> TestResult {
    let dir = fixture()?;
    let mut req = request(dir.path(), LayoutKind::Oneline);
    req.recursion = Some(usize::MAX);
    req.statistic = true;

    let mut out = TripWire {
        written: Vec::new(),
        interrupt: req.interrupt.clone(),
    };
    let mut err = Vec::new();
    let code = app::run(&req, &Theme::default(), &mut out, &mut err)?;
    assert_eq!(code, EXIT_INTERRUPTED);

    let root = dir.path().display().to_string();
    // the first section is finished, nothing after it and no statistic
    assert_eq!(String::from_utf8(out.written)?, format!("{root}:\nsrc\nREADME.md\n"));
    Ok(())
}

#[test]
fn interrupt_before_collecting_lists_nothing() -> TestResult {
    let dir = fixture()?;
    let req = request(dir.path(), LayoutKind::Oneline);
    req.interrupt.trigger();

    let (code, out, _) = run_listing(&req)?;
    assert_eq!(code, EXIT_INTERRUPTED);
    assert!(out.is_empty(), "output was {out:?}");
    Ok(())
}

#[cfg(unix)]
#[test]
fn followed_link_loop_terminates() -> TestResult {
    let dir = fixture()?;
    std::os::unix::fs::symlink(dir.path(), dir.path().join("src/up"))?;
    let mut req = request(dir.path(), LayoutKind::Oneline);
    req.recursion = Some(usize::MAX);
    req.dereference = true;

    let (code, out, err) = run_listing(&req)?;
    assert_eq!(code, 0, "stderr was {err:?}");
    assert_eq!(out.matches("deep.rs").count(), 1);
    assert!(out.contains("\nup\n"));
    Ok(())
}

#[test]
fn far_future_times_render_as_unknown() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("far.txt");
    let file = File::create(&path)?;
    // beyond what a calendar date can represent
    let far = UNIX_EPOCH + Duration::from_secs(10_000_000_000_000);
    if file.set_modified(far).is_err() {
        return Ok(());
    }
    drop(file);
    let stored = fs::metadata(&path)?.modified()?;
    // some filesystems clamp timestamps
    if stored.duration_since(UNIX_EPOCH).map_or(true, |d| d.as_secs() < 10_000_000_000_000) {
        return Ok(());
    }

    let (code, out, _) = run_listing(&request(dir.path(), LayoutKind::Json))?;
    assert_eq!(code, 0);
    let parsed: JsonListing = serde_json::from_str(&out)?;
    assert_eq!(parsed.entries[0].modified, None);

    let mut req = request(dir.path(), LayoutKind::Oneline);
    req.columns.long = true;
    req.columns.times = TimeColumns::of(&[TimeType::Modified]);
    let (_, out, _) = run_listing(&req)?;
    assert!(out.trim_end().ends_with(" - far.txt"), "output was {out:?}");
    Ok(())
}

#[test]
fn tree_roots_are_not_titled() -> TestResult {
    let dir = fixture()?;
    let mut req = request(dir.path(), LayoutKind::Tree);
    req.recursion = Some(usize::MAX);
    req.paths = vec![dir.path().join("src"), dir.path().join("src/nested")];

    let (_, out, _) = run_listing(&req)?;
    assert!(!out.contains(':'), "output was {out:?}");
    let nested = dir.path().join("src/nested").display().to_string();
    assert!(out.contains(&format!("{nested}\n╰── deep.rs\n")), "output was {out:?}");
    Ok(())
}

#[test]
fn total_and_statistic_follow_the_listing() -> TestResult {
    let dir = fixture()?;
    fs::write(dir.path().join("src/main.rs"), "fn main() {}\n")?;
    let mut req = request(dir.path(), LayoutKind::Oneline);
    req.total_size = true;

    let (_, out, _) = run_listing(&req)?;
    assert_eq!(out, "src\nREADME.md\n  total 10 B\n");

    req.recursive_size = true;
    req.statistic = true;
    let (_, out, _) = run_listing(&req)?;
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[2], "  total 23 B");
    assert!(lines[3].starts_with("  underwent ") && lines[3].ends_with("ms"));
    assert_eq!(lines[4], "  statistic: 1 file(s), 1 dir(s), 0 link(s)");
    Ok(())
}

#[test]
fn csv_lists_every_section_under_one_header() -> TestResult {
    let dir = fixture()?;
    let mut req = request(dir.path(), LayoutKind::Csv);
    req.recursion = Some(usize::MAX);
    req.columns.octal = true;
    req.total_size = true;

    let (_, out, _) = run_listing(&req)?;
    let mut reader = csv::Reader::from_reader(out.as_bytes());
    assert_eq!(reader.headers()?.iter().collect::<Vec<_>>(), ["Octal", "Name"]);
    let mut names: Vec<String> = reader
        .records()
        .map(|r| r.map(|r| r[1].to_string()))
        .collect::<Result<_, _>>()?;
    names.sort();
    assert_eq!(names, ["README.md", "deep.rs", "main.rs", "nested", "src"]);
    Ok(())
}

#[test]
fn header_titles_the_long_view() -> TestResult {
    let dir = fixture()?;
    let mut req = request(dir.path(), LayoutKind::Oneline);
    req.header = true;
    req.columns.octal = true;

    let (_, out, _) = run_listing(&req)?;
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Octal Name");
    assert_eq!(lines.len(), 3);
    Ok(())
}

#[test]
fn repository_heads_show_branch_and_state() -> TestResult {
    if which::which("git").is_err() {
        return Ok(());
    }
    let dir = fixture()?;
    let repo = dir.path().join("src");
    let git = |args: &[&str]| Command::new("git").arg("-C").arg(&repo).args(args).output();
    if !git(&["init", "-q"])?.status.success() {
        return Ok(());
    }
    git(&["symbolic-ref", "HEAD", "refs/heads/trunk"])?;

    let mut req = request(dir.path(), LayoutKind::Json);
    req.columns.repo_status = true;
    req.columns.repo_branch = true;

    let (_, out, _) = run_listing(&req)?;
    let parsed: JsonListing = serde_json::from_str(&out)?;
    let head = |name: &str| {
        parsed
            .entries
            .iter()
            .find(|e| e.name == name)
            .and_then(|e| e.repo.clone())
    };
    let src = head("src").ok_or("src is a repository")?;
    assert_eq!(src.branch.as_deref(), Some("trunk"));
    // untracked files make it dirty
    assert!(src.dirty);
    assert_eq!(head("README.md"), None);
    Ok(())
}
