use std::fs;

use tempfile::tempdir;
use wp_sync_core::config::SyncConfig;
use wp_sync_core::contract::{CategoryMap, Post, PostStatus, Rendered};
use wp_sync_core::render::{render_post, sanitize_filename, write_post};

fn sample_post() -> Post {
    Post {
        id: 11,
        title: Rendered {
            rendered: "春天 &#8211; Spring".to_string(),
        },
        date: "2024-03-20T08:30:00".to_string(),
        content: Rendered {
            rendered: "<p>第一段</p>\n<script>alert(1)</script>\n".to_string(),
        },
        slug: "spring notes".to_string(),
        categories: vec![3, 99],
        status: PostStatus::Publish,
    }
}

#[test]
fn sanitized_names_never_contain_unsafe_characters() {
    let slugs = [
        r#"a b\c/d*e?f:g"h<i>j|k"#,
        "  leading and trailing  ",
        "plain-slug",
        "with!bang",
    ];
    for slug in slugs {
        let name = sanitize_filename(slug, 1);
        assert!(name.ends_with(".md"), "{name}");
        for c in ['\\', '/', '*', '?', ':', '"', '<', '>', '|', ' '] {
            assert!(!name.contains(c), "{name:?} contains {c:?}");
        }
    }
}

#[test]
fn front_matter_keeps_non_ascii_unescaped_and_body_untouched() {
    let mut categories = CategoryMap::new();
    categories.insert(3, "随笔".to_string());
    let post = sample_post();

    let rendered = render_post(&post, &categories, &SyncConfig::default()).unwrap();

    assert_eq!(rendered.file_name, "spring_notes.md");
    assert!(rendered.content.contains("春天 &#8211; Spring"));
    assert!(rendered.content.contains("随笔"));
    assert!(!rendered.content.contains("\\u"));
    assert!(rendered
        .content
        .ends_with("---\n<p>第一段</p>\n<script>alert(1)</script>\n"));

    let front = rendered.content.split("---\n").nth(1).unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(front).unwrap();
    assert_eq!(value["author"], "WordPress Sync");
    assert_eq!(value["categories"][0], "随笔");
    assert_eq!(value["categories"][1], "Uncategorized");
    assert_eq!(value["tags"].as_sequence().map(|s| s.len()), Some(0));
}

#[test]
fn configured_labels_and_tags_are_used() {
    let config = SyncConfig {
        uncategorized_label: "未分类".to_string(),
        default_tags: vec!["wordpress".to_string()],
        marker: "generated-by-wp-sync".to_string(),
        ..SyncConfig::default()
    };
    let rendered = render_post(&sample_post(), &CategoryMap::new(), &config).unwrap();
    let front = rendered.content.split("---\n").nth(1).unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(front).unwrap();

    assert_eq!(value["categories"][0], "未分类");
    assert_eq!(value["tags"][0], "wordpress");
    assert_eq!(value["author"], "generated-by-wp-sync");
}

#[test]
fn rendering_is_deterministic_and_write_overwrites() {
    let dir = tempdir().unwrap();
    let config = SyncConfig::default();
    let categories = CategoryMap::new();

    let first = render_post(&sample_post(), &categories, &config).unwrap();
    let second = render_post(&sample_post(), &categories, &config).unwrap();
    assert_eq!(first, second);

    let path = dir.path().join(&first.file_name);
    fs::write(&path, "stale content").unwrap();
    let written = write_post(dir.path(), &first).unwrap();

    assert_eq!(written, path);
    assert_eq!(fs::read_to_string(&path).unwrap(), first.content);
}
