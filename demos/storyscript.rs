//! A narrated worked example, replacing the teacher's own `src/examples/json` grammar tutorial
//! (see `DESIGN.md`'s trimming notes) with one over a small Storyscript program instead.
//!
//! Run with `cargo run --example storyscript`.

use storyscript::story::loads;

fn main() {
    let source = r#"
color = "blue"
greeting = "hello {{color}}"
if greeting
  print run
else
  fallback run
"#;

    let result = loads(source).expect("sample program should compile");

    println!("entrypoint: {:?}", result.entrypoint);
    println!(
        "{}",
        serde_json::to_string_pretty(&result.script).expect("Script always serializes")
    );
}
