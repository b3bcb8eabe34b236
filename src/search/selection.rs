/// Invoice URLs picked for download, plus the state of the "select all" box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceSelection {
    selected: Vec<String>,
    all_selected: bool,
}

impl InvoiceSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, url: &str, checked: bool) {
        if checked {
            if !self.contains(url) {
                self.selected.push(url.to_string());
            }
        } else {
            self.all_selected = false;
            self.selected.retain(|selected| selected != url);
        }
    }

    pub fn set_select_all(&mut self, checked: bool, available: &[String]) {
        self.selected.clear();
        self.all_selected = checked;
        if checked {
            for url in available {
                if !self.contains(url) {
                    self.selected.push(url.clone());
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.all_selected = false;
    }

    /// Downloading with nothing picked means downloading everything.
    pub fn download_targets(&mut self, available: &[String]) -> Vec<String> {
        if self.selected.is_empty() {
            self.set_select_all(true, available);
        }
        self.selected.clone()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.selected.iter().any(|selected| selected == url)
    }

    pub fn urls(&self) -> &[String] {
        &self.selected
    }

    pub fn is_all_selected(&self) -> bool {
        self.all_selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }
}
