use super::*;

fn index(names: &[&str]) -> PortraitIndex {
    PortraitIndex::from_files(names.iter().map(|n| PathBuf::from("img").join(n)).collect())
}

#[test]
fn exact_name_wins() {
    let idx = index(&["Tim Cheese_2.png", "Tim Cheese.jpg", "Tim Cheese_1.png"]);
    assert_eq!(idx.find("Tim Cheese"), Some(Path::new("img/Tim Cheese.jpg")));
}

#[test]
fn numbered_variants_sort_and_prefer_png() {
    let idx = index(&["Tim Cheese_2.png", "Tim Cheese_1.webp", "Tim Cheese_3.png"]);
    assert_eq!(idx.find("Tim Cheese"), Some(Path::new("img/Tim Cheese_2.png")));
}

#[test]
fn case_insensitive_prefix_is_the_last_resort() {
    let idx = index(&["tim cheese portrait.jpeg", "notes.txt"]);
    assert_eq!(idx.len(), 1);
    assert_eq!(
        idx.find("Tim Cheese"),
        Some(Path::new("img/tim cheese portrait.jpeg"))
    );
    assert_eq!(idx.find("Odin"), None);
}

#[test]
fn missing_directory_is_empty() {
    let idx = PortraitIndex::scan("/definitely/not/a/dir").unwrap();
    assert!(idx.is_empty());
}

#[test]
fn scan_lists_only_images() {
    let dir = std::env::temp_dir().join(format!("cardpress-lookup-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("A_1.png"), b"x").unwrap();
    std::fs::write(dir.join("A.txt"), b"x").unwrap();
    std::fs::write(dir.join("B.WEBP"), b"x").unwrap();

    let idx = PortraitIndex::scan(&dir).unwrap();
    assert_eq!(idx.len(), 2);
    assert_eq!(idx.find("A"), Some(dir.join("A_1.png").as_path()));
    assert_eq!(idx.find("B"), Some(dir.join("B.WEBP").as_path()));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn load_reads_the_matched_file() {
    let dir = std::env::temp_dir().join(format!("cardpress-load-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("Tim Cheese_1.png"), b"bytes").unwrap();

    let idx = PortraitIndex::scan(&dir).unwrap();
    let source = idx.load("Tim Cheese").unwrap();
    assert_eq!(source.bytes, b"bytes");
    assert_eq!(source.hint, ImageFormatHint::Extension("png".into()));
    assert!(idx.load("Odin").is_none());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unreadable_portrait_loads_as_empty_bytes() {
    // Indexed but gone by the time the batch reads it.
    let idx = index(&["Ghost_1.jpg"]);
    let source = idx.load("Ghost").unwrap();
    assert!(source.bytes.is_empty());
    assert_eq!(source.hint, ImageFormatHint::Extension("jpg".into()));
}
