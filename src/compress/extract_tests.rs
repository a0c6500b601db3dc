use std::time::Duration;

use super::*;
use crate::compress::registry::spec_for_path;

const DEADLINE: Duration = Duration::from_secs(5);

fn extract(path: &str, source: &str) -> String {
    let spec = spec_for_path(path).unwrap();
    extract_signatures(source, spec, DEADLINE).unwrap()
}

/// Every line of the extraction is a contiguous substring of the source:
/// slices are verbatim, so no characters may be introduced.
fn assert_faithful(source: &str, extracted: &str) {
    for line in extracted.lines() {
        if !line.is_empty() {
            assert!(
                source.contains(line),
                "extracted line is not verbatim source: {line:?}"
            );
        }
    }
}

#[test]
fn rust_function_bodies_are_elided() {
    let source = "/// Adds two numbers.\npub fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n";
    let extracted = extract("lib.rs", source);

    assert!(extracted.contains("pub fn add(a: i32, b: i32) -> i32"));
    assert!(!extracted.contains("a + b"));
    assert!(extracted.contains("/// Adds two numbers."));
    assert_faithful(source, &extracted);
}

#[test]
fn rust_type_declarations_are_kept_in_full() {
    let source = "pub struct Point {\n    pub x: i32,\n    pub y: i32,\n}\n\npub enum Shape {\n    Circle(f64),\n    Square(f64),\n}\n\nuse std::fmt;\n\npub const LIMIT: usize = 10;\n";
    let extracted = extract("types.rs", source);

    assert!(extracted.contains("pub x: i32"));
    assert!(extracted.contains("Circle(f64)"));
    assert!(extracted.contains("use std::fmt;"));
    assert!(extracted.contains("pub const LIMIT: usize = 10;"));
    assert_faithful(source, &extracted);
}

#[test]
fn rust_impl_members_surface_as_signatures() {
    let source = "pub struct Counter(u32);\n\nimpl Counter {\n    pub fn increment(&mut self) -> u32 {\n        self.0 += 1;\n        self.0\n    }\n}\n";
    let extracted = extract("counter.rs", source);

    assert!(extracted.contains("impl Counter"));
    assert!(extracted.contains("pub fn increment(&mut self) -> u32"));
    assert!(!extracted.contains("self.0 += 1"));
    assert_faithful(source, &extracted);
}

#[test]
fn go_declarations_extract() {
    let source = "package main\n\nimport \"fmt\"\n\ntype Server struct {\n\tAddr string\n}\n\nfunc (s *Server) Start() error {\n\tfmt.Println(s.Addr)\n\treturn nil\n}\n";
    let extracted = extract("server.go", source);

    assert!(extracted.contains("package main"));
    assert!(extracted.contains("import \"fmt\""));
    assert!(extracted.contains("Addr string"));
    assert!(extracted.contains("func (s *Server) Start() error"));
    assert!(!extracted.contains("fmt.Println"));
    assert_faithful(source, &extracted);
}

#[test]
fn python_class_methods_surface_as_signatures() {
    let source = "import os\n\nclass Cache:\n    def get(self, key):\n        return self.data[key]\n";
    let extracted = extract("cache.py", source);

    assert!(extracted.contains("import os"));
    assert!(extracted.contains("class Cache"));
    assert!(extracted.contains("def get(self, key)"));
    assert!(!extracted.contains("self.data[key]"));
    assert_faithful(source, &extracted);
}

#[test]
fn typescript_interfaces_are_kept_in_full() {
    let source = "import { api } from './api';\n\nexport interface User {\n  id: number;\n  name: string;\n}\n\nexport function load(id: number): User {\n  return api.get(id);\n}\n";
    let extracted = extract("user.ts", source);

    assert!(extracted.contains("id: number;"));
    assert!(extracted.contains("export function load(id: number): User")
        || extracted.contains("function load(id: number): User"));
    assert!(!extracted.contains("api.get(id)"));
    assert_faithful(source, &extracted);
}

#[test]
fn javascript_bare_reexports_are_kept() {
    let source = "export { helper } from './helper';\n\nfunction internal() {\n  return 1;\n}\n";
    let extracted = extract("index.js", source);

    assert!(extracted.contains("export { helper } from './helper';"));
    assert!(extracted.contains("function internal()"));
    assert!(!extracted.contains("return 1"));
    assert_faithful(source, &extracted);
}

#[test]
fn source_without_declarations_yields_none() {
    let spec = spec_for_path("empty.rs").unwrap();
    assert!(extract_signatures("// nothing here\n", spec, DEADLINE).is_none());
}
