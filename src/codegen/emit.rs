/// Line-oriented text accumulator with indentation tracking.
///
/// Every line is written at the current depth. [`EmissionBuffer::with_indent`]
/// restores the depth on every exit path of its closure, including early `?`
/// returns; `indent`/`dedent` exist for owners that wrap the buffer in their
/// own scoped helper.
pub struct EmissionBuffer {
    out: String,
    depth: usize,
    width: usize,
}

impl EmissionBuffer {
    pub fn new(indent_width: usize) -> Self {
        Self { out: String::new(), depth: 0, width: indent_width }
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth * self.width {
                self.out.push(' ');
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    pub fn blank_line(&mut self) {
        self.out.push('\n');
    }

    /// Writes a multi-line chunk, one `line` per source line.
    pub fn lines(&mut self, chunk: &str) {
        for l in chunk.lines() {
            self.line(l);
        }
    }

    pub fn with_indent<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.indent();
        let result = f(self);
        self.dedent();
        result
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn append(&mut self, other: EmissionBuffer) {
        self.out.push_str(&other.out);
    }

    pub fn finish(self) -> String {
        self.out
    }
}
