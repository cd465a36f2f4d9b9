//! Minimal html cleanup for senses scraped from wiki pages.
//!
//! Tags are dropped and their text kept, except for `<ref>` whose content is
//! removed. Single digits in `<sup>`/`<sub>` become super/subscript characters.
//! Character references are decoded against the full html5 entity table;
//! unknown names stay as written.

const IGNORE_TAG_CONTENT: &[&str] = &["ref"];

fn superscript(digit: &str) -> Option<&'static str> {
    Some(match digit {
        "1" => "\u{00B9}",
        "2" => "\u{00B2}",
        "3" => "\u{00B3}",
        "4" => "\u{2074}",
        "5" => "\u{2075}",
        "6" => "\u{2076}",
        "7" => "\u{2077}",
        "8" => "\u{2078}",
        "9" => "\u{2079}",
        _ => return None,
    })
}

fn subscript(digit: &str) -> Option<&'static str> {
    Some(match digit {
        "1" => "\u{2081}",
        "2" => "\u{2082}",
        "3" => "\u{2083}",
        "4" => "\u{2084}",
        "5" => "\u{2085}",
        "6" => "\u{2086}",
        "7" => "\u{2087}",
        "8" => "\u{2088}",
        "9" => "\u{2089}",
        _ => return None,
    })
}

enum Tag<'a> {
    Start(&'a str),
    End(&'a str),
    StartEnd(&'a str),
    Other,
}

fn parse_tag(inner: &str) -> Tag<'_> {
    let name_of = |s: &'_ str| -> usize {
        s.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':'))
            .unwrap_or(s.len())
    };
    if let Some(rest) = inner.strip_prefix('/') {
        let end = name_of(rest);
        return Tag::End(&rest[..end]);
    }
    if inner.starts_with('!') || inner.starts_with('?') {
        return Tag::Other;
    }
    let end = name_of(inner);
    if end == 0 {
        return Tag::Other;
    }
    if inner.trim_end().ends_with('/') {
        Tag::StartEnd(&inner[..end])
    } else {
        Tag::Start(&inner[..end])
    }
}

#[derive(Default)]
struct HtmlCleaner {
    output: String,
    tag_data: String,
    tag_stack: Vec<String>,
    ignore_depth: usize,
}

impl HtmlCleaner {
    fn flush(&mut self) {
        if self.ignore_depth == 0 {
            self.output
                .push_str(&html_escape::decode_html_entities(&self.tag_data));
        }
        self.tag_data.clear();
    }

    fn start(&mut self, name: &str) {
        self.flush();
        let name = name.to_ascii_lowercase();
        if IGNORE_TAG_CONTENT.contains(&name.as_str()) {
            self.ignore_depth += 1;
        }
        self.tag_stack.push(name);
    }

    fn end(&mut self, name: &str) {
        let name = name.to_ascii_lowercase();
        if self.tag_stack.last() == Some(&name) {
            self.tag_stack.pop();
        }
        let mapped = match name.as_str() {
            "sup" => superscript(&self.tag_data),
            "sub" => subscript(&self.tag_data),
            _ => None,
        };
        if let Some(mapped) = mapped {
            self.tag_data = mapped.to_string();
        }
        if IGNORE_TAG_CONTENT.contains(&name.as_str()) {
            self.tag_data.clear();
            self.ignore_depth = self.ignore_depth.saturating_sub(1);
        }
        self.flush();
    }

    fn feed(&mut self, html: &str) {
        let mut rest = html;
        while let Some(pos) = rest.find('<') {
            self.tag_data.push_str(&rest[..pos]);
            rest = &rest[pos..];
            let Some(close) = rest.find('>') else {
                rest = "";
                break;
            };
            match parse_tag(&rest[1..close]) {
                Tag::Start(name) => self.start(name),
                Tag::End(name) => self.end(name),
                Tag::StartEnd(name) => {
                    self.start(name);
                    self.end(name);
                }
                Tag::Other => {}
            }
            rest = &rest[close + 1..];
        }
        self.tag_data.push_str(rest);
        self.flush();
    }
}

/// Strips tags and decodes entities.
pub fn clean_html(html: &str) -> String {
    let mut cleaner = HtmlCleaner::default();
    cleaner.feed(html);
    cleaner.output
}
