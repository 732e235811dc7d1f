// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_message_html(paragraphs: usize) -> String {
    let base = r#"<p>Thanks <mention id="1">Patricia Adams</mention>, can you and <mention id="2">Zoë</mention> look at <b>the draft</b> before Friday?<br/></p>"#;
    base.repeat(paragraphs)
}

#[allow(dead_code)]
pub fn generate_nested_html(depth: usize) -> String {
    let mut html = String::from(r#"<mention id="deep">Deep Mention</mention> text"#);
    for level in 0..depth {
        html = format!("<span>level {level} {html}</span>");
    }
    html
}
