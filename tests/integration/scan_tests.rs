use dupscan::duplicates::{DuplicateFinder, FinderConfig, FinderError, InvalidReason, SearchStyle};
use dupscan::progress::ProgressCallback;
use dupscan::scanner::{HashError, Hasher, WalkerConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

fn finder(app: &TempDir, style: SearchStyle) -> DuplicateFinder {
    DuplicateFinder::new(
        app.path().join("app"),
        FinderConfig::default().with_search_style(style),
    )
    .unwrap()
}

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Twenty files holding four-character counters. Every file has the same
/// size; contents repeat only for counters 0 and 1.
fn counter_fixture(dir: &Path) {
    for i in 0..20 {
        write(dir, &format!("randoFile{i:02}"), format!("{:04}", i % 18).as_bytes());
    }
}

#[test]
fn test_scan_empty_directory() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();

    for style in [SearchStyle::BySize, SearchStyle::ByContents] {
        let (index, summary) = finder(&app, style).scan(root.path()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.groups().count(), 0);
        assert_eq!(summary.total_files, 0);
        assert_eq!(summary.duplicate_groups, 0);
    }
}

#[test]
fn test_counter_fixture_by_size() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    counter_fixture(root.path());

    let (index, summary) = finder(&app, SearchStyle::BySize).scan(root.path()).unwrap();

    let groups: Vec<_> = index.groups().collect();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "4");
    assert_eq!(groups[0].len(), 20);
    assert_eq!(summary.total_files, 20);
    assert_eq!(summary.duplicate_files, 19);
}

#[test]
fn test_counter_fixture_by_contents() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    counter_fixture(root.path());

    let (index, summary) = finder(&app, SearchStyle::ByContents)
        .scan(root.path())
        .unwrap();

    let groups: Vec<_> = index.groups().collect();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key, Hasher::hash_bytes(b"0000"));
    assert_eq!(
        groups[0].paths,
        &[root.path().join("randoFile00"), root.path().join("randoFile18")]
    );
    assert_eq!(groups[1].key, Hasher::hash_bytes(b"0001"));
    assert_eq!(
        groups[1].paths,
        &[root.path().join("randoFile01"), root.path().join("randoFile19")]
    );
    assert_eq!(summary.distinct_keys, 18);
    assert_eq!(summary.indexed_files, 20);
}

#[test]
fn test_contents_groups_are_subsets_of_size_groups() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    write(root.path(), "a", b"abc");
    write(root.path(), "b", b"abc");
    write(root.path(), "c", b"xyz");
    write(root.path(), "d", b"longer");

    let (by_size, _) = finder(&app, SearchStyle::BySize).scan(root.path()).unwrap();
    let (by_contents, _) = finder(&app, SearchStyle::ByContents)
        .scan(root.path())
        .unwrap();

    assert_eq!(by_contents.group_count(), 1);
    for group in by_contents.groups() {
        let containing = by_size
            .groups()
            .find(|size_group| group.paths.iter().all(|p| size_group.paths.contains(p)));
        assert!(
            containing.is_some(),
            "content group {} not within a size group",
            group.key
        );
    }
}

#[test]
fn test_nested_directories_are_walked() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    let a = write(root.path(), "one/deep/a.txt", b"same");
    let b = write(root.path(), "two/b.txt", b"same");

    let (index, _) = finder(&app, SearchStyle::ByContents)
        .scan(root.path())
        .unwrap();

    let groups: Vec<_> = index.groups().collect();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths, &[a, b]);
}

#[test]
fn test_empty_files_are_grouped() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    write(root.path(), "e1", b"");
    write(root.path(), "e2", b"");

    let (index, _) = finder(&app, SearchStyle::BySize).scan(root.path()).unwrap();
    assert_eq!(index.get("0").map(<[PathBuf]>::len), Some(2));

    let (index, _) = finder(&app, SearchStyle::ByContents)
        .scan(root.path())
        .unwrap();
    let empty_digest = "da39a3ee5e6b4b0d3255bfef95601890afd80709";
    assert_eq!(index.get(empty_digest).map(<[PathBuf]>::len), Some(2));
}

#[test]
fn test_scan_missing_root() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    let missing = root.path().join("does-not-exist");

    let err = finder(&app, SearchStyle::BySize).scan(&missing).unwrap_err();
    match err {
        FinderError::InvalidSearchDirectory { path, reason } => {
            assert_eq!(path, missing);
            assert_eq!(reason, InvalidReason::DoesNotExist);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_scan_file_as_root() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    let file = write(root.path(), "plain.txt", b"x");

    let err = finder(&app, SearchStyle::ByContents).scan(&file).unwrap_err();
    assert!(matches!(
        err,
        FinderError::InvalidSearchDirectory {
            reason: InvalidReason::NotADirectory,
            ..
        }
    ));
}

#[test]
fn test_app_dir_is_created() {
    let app = tempdir().unwrap();
    let app_dir = app.path().join("nested").join("state");

    let finder = DuplicateFinder::new(&app_dir, FinderConfig::default()).unwrap();
    assert!(app_dir.is_dir());
    assert_eq!(finder.app_dir(), app_dir.as_path());

    // existing directory is reused
    DuplicateFinder::new(&app_dir, FinderConfig::default()).unwrap();
}

#[test]
fn test_app_dir_blocked_by_file() {
    let app = tempdir().unwrap();
    let blocker = write(app.path(), "blocker", b"not a directory");

    let err = DuplicateFinder::new(&blocker, FinderConfig::default()).unwrap_err();
    assert!(matches!(err, FinderError::DirectoryBootstrapFailure { .. }));
}

#[test]
fn test_switching_style_between_scans() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    write(root.path(), "a", b"12");
    write(root.path(), "b", b"34");

    let mut finder = finder(&app, SearchStyle::BySize);
    let (by_size, _) = finder.scan(root.path()).unwrap();
    assert_eq!(by_size.group_count(), 1);

    finder.set_search_style(SearchStyle::ByContents);
    let (by_contents, _) = finder.scan(root.path()).unwrap();
    assert_eq!(by_contents.group_count(), 0);
}

#[test]
fn test_repeated_scans_are_identical() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    counter_fixture(root.path());
    write(root.path(), "sub/copy", b"0003");

    let finder = finder(&app, SearchStyle::ByContents);
    let (first, _) = finder.scan(root.path()).unwrap();
    let (second, _) = finder.scan(root.path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_walker_filters_apply_to_scan() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    write(root.path(), "a.log", b"same");
    write(root.path(), "b.log", b"same");
    write(root.path(), ".hidden", b"same");
    write(root.path(), "keep.txt", b"same");

    let config = FinderConfig::default()
        .with_search_style(SearchStyle::ByContents)
        .with_walker_config(
            WalkerConfig::default()
                .with_skip_hidden(true)
                .with_ignore_patterns(vec!["*.log".to_string()]),
        );
    let finder = DuplicateFinder::new(app.path().join("app"), config).unwrap();
    let (index, summary) = finder.scan(root.path()).unwrap();

    assert_eq!(summary.total_files, 1);
    assert_eq!(index.group_count(), 0);
}

#[test]
fn test_three_file_content_scenario() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    let a = write(root.path(), "a", b"0000");
    let b = write(root.path(), "b", b"0000");
    write(root.path(), "c", b"0001");

    let (index, _) = finder(&app, SearchStyle::ByContents)
        .scan(root.path())
        .unwrap();

    let groups: Vec<_> = index.groups().collect();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key.len(), 40);
    assert!(groups[0].key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_eq!(groups[0].paths, &[a, b]);
}

#[test]
fn test_gitignored_duplicates_grouped_by_default() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    write(root.path(), ".gitignore", b"*.bin\n");
    let a = write(root.path(), "a.bin", b"0000");
    let b = write(root.path(), "b.bin", b"0000");

    let (index, summary) = finder(&app, SearchStyle::ByContents)
        .scan(root.path())
        .unwrap();

    assert_eq!(summary.total_files, 3);
    let groups: Vec<_> = index.groups().collect();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths, &[a, b]);
}

#[test]
fn test_gitignore_applied_when_requested() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    write(root.path(), ".gitignore", b"*.bin\n");
    write(root.path(), "a.bin", b"0000");
    write(root.path(), "b.bin", b"0000");

    let config = FinderConfig::default()
        .with_search_style(SearchStyle::ByContents)
        .with_walker_config(WalkerConfig::default().with_respect_gitignore(true));
    let finder = DuplicateFinder::new(app.path().join("app"), config).unwrap();
    let (index, summary) = finder.scan(root.path()).unwrap();

    assert_eq!(summary.total_files, 1);
    assert_eq!(index.group_count(), 0);
}

/// Removes a file once hashing starts, after the walk has listed it.
struct RemoveBeforeHashing {
    victim: PathBuf,
}

impl ProgressCallback for RemoveBeforeHashing {
    fn on_phase_start(&self, phase: &str, _total: usize) {
        if phase == "hashing" {
            fs::remove_file(&self.victim).unwrap();
        }
    }

    fn on_progress(&self, _current: usize, _path: &str) {}

    fn on_phase_end(&self, _phase: &str) {}
}

#[test]
fn test_vanished_file_aborts_content_scan() {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    write(root.path(), "a", b"0000");
    let b = write(root.path(), "b", b"0000");

    let config = FinderConfig::default()
        .with_search_style(SearchStyle::ByContents)
        .with_size_prefilter(true)
        .with_progress_callback(Arc::new(RemoveBeforeHashing { victim: b.clone() }));
    let finder = DuplicateFinder::new(app.path().join("app"), config).unwrap();

    match finder.scan(root.path()) {
        Err(FinderError::FileReadFailure { path, source }) => {
            assert_eq!(path, b);
            assert!(matches!(source, HashError::NotFound(_)));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("scan succeeded although {} was removed", b.display()),
    }
}

#[test]
#[cfg(unix)]
fn test_unreadable_file_aborts_content_scan() {
    use std::os::unix::fs::PermissionsExt;

    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    write(root.path(), "a", b"0000");
    let locked = write(root.path(), "b", b"0000");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still open the file.
    if fs::File::open(&locked).is_ok() {
        return;
    }

    let err = finder(&app, SearchStyle::ByContents)
        .scan(root.path())
        .unwrap_err();
    assert!(matches!(
        err,
        FinderError::FileReadFailure { ref path, .. } if path == &locked
    ));

    // Size keys never open the file.
    let (index, _) = finder(&app, SearchStyle::BySize).scan(root.path()).unwrap();
    assert_eq!(index.group_count(), 1);
}
