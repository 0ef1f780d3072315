//! Override list domain helper.

/// Stock Roboto files replaced when the user has no saved list.
pub const DEFAULT_OVERRIDES: [&str; 12] = [
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
    "Roboto-Medium.ttf",
    "Roboto-MediumItalic.ttf",
    "Roboto-Light.ttf",
    "Roboto-LightItalic.ttf",
    "Roboto-Thin.ttf",
    "Roboto-ThinItalic.ttf",
    "RobotoStatic-Regular.ttf",
    "Roboto-Variable.ttf",
];

/// Target filenames under `system/fonts`, in the order the user entered them.
///
/// Blank entries and duplicates are kept here; [`OverrideList::cleaned`] drops the blanks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverrideList {
    entries: Vec<String>,
}

impl OverrideList {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn stock() -> Self {
        Self::new(DEFAULT_OVERRIDES.iter().map(|s| s.to_string()).collect())
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Trimmed, non-blank entries. This is also the form persisted for the next session.
    pub fn cleaned(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.trim())
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleaned_trims_and_drops_blank_entries_but_keeps_duplicates() {
        let list = OverrideList::new(vec![
            " Roboto-Regular ".into(),
            "".into(),
            "   ".into(),
            "A".into(),
            "A".into(),
        ]);

        assert_eq!(list.cleaned(), vec!["Roboto-Regular", "A", "A"]);
    }

    #[test]
    fn stock_list_matches_defaults() {
        let list = OverrideList::stock();
        assert_eq!(list.entries().len(), DEFAULT_OVERRIDES.len());
        assert_eq!(list.entries()[0], "Roboto-Regular.ttf");
    }
}
