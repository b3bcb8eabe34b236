use std::sync::OnceLock;

use regex::Regex;

/// The container a live search renders into. Its content is only ever swapped as a
/// whole, so old and new rows can never be visible together.
#[derive(Debug, Clone, Default)]
pub struct ResultRegion {
    content: String,
    query: Option<String>,
    generation: u64,
    diagnostic: Option<String>,
}

impl ResultRegion {
    pub fn new(initial: impl Into<String>) -> Self {
        Self { content: initial.into(), ..Default::default() }
    }

    pub fn replace(&mut self, query: &str, fragment: String) {
        self.content = fragment;
        self.query = Some(query.to_string());
        self.generation += 1;
        self.diagnostic = None;
    }

    /// Leaves the visible content untouched.
    pub fn set_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostic = Some(message.into());
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Query whose results are showing, `None` for the initial render.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// `value` attributes of every `<input>` in the content carrying `class_name`,
    /// in document order.
    pub fn checkbox_values(&self, class_name: &str) -> Vec<String> {
        static INPUT: OnceLock<Regex> = OnceLock::new();
        static CLASS: OnceLock<Regex> = OnceLock::new();
        static VALUE: OnceLock<Regex> = OnceLock::new();

        let input = INPUT.get_or_init(|| Regex::new(r"(?is)<input\b[^>]*>").unwrap());
        let class = CLASS
            .get_or_init(|| Regex::new(r#"(?i)\bclass\s*=\s*["']([^"']*)["']"#).unwrap());
        let value = VALUE
            .get_or_init(|| Regex::new(r#"(?i)\bvalue\s*=\s*["']([^"']*)["']"#).unwrap());

        input
            .find_iter(&self.content)
            .map(|tag| tag.as_str())
            .filter(|tag| {
                class
                    .captures(tag)
                    .is_some_and(|caps| caps[1].split_whitespace().any(|c| c == class_name))
            })
            .filter_map(|tag| value.captures(tag).map(|caps| caps[1].to_string()))
            .collect()
    }
}
