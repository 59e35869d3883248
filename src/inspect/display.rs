use std::fmt::{self, Display};

use crate::value::{Value, Visitor};

impl Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, Layout::Compact))
    }
}

impl Value<'_> {
    /// One node per line, nested nodes indented by one tab per level.
    pub fn as_pretty_printed(&self) -> String {
        render(self, Layout::Pretty { line_break: "\n" })
    }

    /// The pretty printed form as a `let` binding of a Rust byte-string literal.
    pub fn as_rust_string_literal(&self) -> String {
        let mut output = String::from("let pretty_bencode = b\"\\\n");
        output.push_str(&render(self, Layout::Pretty { line_break: "\\\n" }));
        output.push_str("\\\n\"");
        output
    }
}

#[derive(Clone, Copy)]
enum Layout {
    Compact,
    Pretty { line_break: &'static str },
}

fn render(value: &Value, layout: Layout) -> String {
    let mut printer = Printer {
        layout,
        indent: 0,
        out: String::new(),
    };
    value.walk(&mut printer);
    printer.out
}

struct Printer {
    layout: Layout,
    indent: usize,
    out: String,
}

impl Printer {
    fn newline(&mut self) {
        if let Layout::Pretty { line_break } = self.layout {
            self.out.push_str(line_break);
            for _ in 0..self.indent {
                self.out.push('\t');
            }
        }
    }

    /// Members of a container start on a fresh line.
    fn start_node(&mut self) {
        if self.indent > 0 {
            self.newline();
        }
    }

    fn open(&mut self, marker: char) {
        self.start_node();
        self.out.push(marker);
        self.indent += 1;
    }

    fn close(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.newline();
        self.out.push('e');
    }

    fn string(&mut self, bytes: &[u8]) {
        self.start_node();
        self.out.push_str(&format!("{}:", bytes.len()));
        if bytes.iter().copied().all(is_printable_byte) {
            self.out.extend(bytes.iter().copied().map(char::from));
        } else {
            for b in bytes {
                self.out.push_str(&format!("\\x{b:02X}"));
            }
        }
    }
}

impl Visitor for Printer {
    fn bytes(&mut self, bytes: &[u8]) {
        self.string(bytes);
    }

    fn integer(&mut self, value: i64) {
        self.start_node();
        self.out.push_str(&format!("i{value}e"));
    }

    fn begin_list(&mut self, _len: usize) {
        self.open('l');
    }

    fn end_list(&mut self) {
        self.close();
    }

    fn begin_dict(&mut self, _len: usize) {
        self.open('d');
    }

    fn key(&mut self, key: &[u8]) {
        self.string(key);
    }

    fn end_dict(&mut self) {
        self.close();
    }
}

fn is_printable_byte(b: u8) -> bool {
    (40..127).contains(&b) && b != b'\\'
}
