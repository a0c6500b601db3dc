use super::*;

fn paths(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn renders_nested_box_drawing() {
    let tree = render_tree(
        &paths(&["go.mod", "src/main.go", "src/util.go"]),
        None,
    );
    let expected = ".\n\
                    ├── go.mod\n\
                    └── src\n\
                    \u{20}   ├── main.go\n\
                    \u{20}   └── util.go\n";
    assert_eq!(tree, expected);
}

#[test]
fn sibling_directories_use_vertical_rails() {
    let tree = render_tree(&paths(&["a/one.rs", "b/two.rs", "c.rs"]), None);
    assert!(tree.contains("├── a"));
    assert!(tree.contains("│   └── one.rs"));
    assert!(tree.contains("├── b"));
    assert!(tree.contains("└── c.rs"));
}

#[test]
fn depth_limit_collapses_deep_paths() {
    let tree = render_tree(&paths(&["a/b/c/d.rs"]), Some(2));
    assert!(tree.contains("└── a"));
    assert!(tree.contains("└── b"));
    assert!(!tree.contains("c"));
    assert!(!tree.contains("d.rs"));
}

#[test]
fn empty_input_is_just_the_root() {
    assert_eq!(render_tree(&[], None), ".\n");
}

#[test]
fn output_is_deterministic_regardless_of_input_order() {
    let forward = render_tree(&paths(&["a.rs", "z.rs", "m/x.rs"]), None);
    let reversed = render_tree(&paths(&["m/x.rs", "z.rs", "a.rs"]), None);
    assert_eq!(forward, reversed);
}
