use serde::Serialize;

pub const BOARDS: &[&str] = &["UPMSP", "CBSE", "ICSE"];
pub const LANGUAGES: &[&str] = &["hindi", "english"];
pub const CLASS_LEVELS: &[&str] = &["10", "11", "12"];
pub const SUBJECTS: &[&str] = &["math", "science", "history"];

/// The unselected value for every filter field.
pub const UNSELECTED: &str = "";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Board,
    Language,
    ClassLevel,
    Subject,
}

impl FilterField {
    pub fn all() -> [FilterField; 4] {
        [
            FilterField::Board,
            FilterField::Language,
            FilterField::ClassLevel,
            FilterField::Subject,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Board => "Board",
            FilterField::Language => "Language",
            FilterField::ClassLevel => "Class",
            FilterField::Subject => "Subject",
        }
    }

    /// The closed enumeration of valid values for this field.
    pub fn options(&self) -> &'static [&'static str] {
        match self {
            FilterField::Board => BOARDS,
            FilterField::Language => LANGUAGES,
            FilterField::ClassLevel => CLASS_LEVELS,
            FilterField::Subject => SUBJECTS,
        }
    }
}

/// The four enumerated filter fields sent with every question.
///
/// Empty string means unselected. Values outside the closed enumerations
/// are never stored; `set` maps them back to unselected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub board: String,
    pub language: String,
    #[serde(rename = "classLevel")]
    pub class_level: String,
    pub subject: String,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Board => &self.board,
            FilterField::Language => &self.language,
            FilterField::ClassLevel => &self.class_level,
            FilterField::Subject => &self.subject,
        }
    }

    /// Set one field, leaving the others untouched. A value outside the
    /// field's enumeration (other than the empty string) is stored as
    /// unselected.
    pub fn set(&mut self, field: FilterField, value: &str) {
        let value = if value == UNSELECTED || field.options().contains(&value) {
            value.to_string()
        } else {
            UNSELECTED.to_string()
        };
        match field {
            FilterField::Board => self.board = value,
            FilterField::Language => self.language = value,
            FilterField::ClassLevel => self.class_level = value,
            FilterField::Subject => self.subject = value,
        }
    }

    pub fn clear(&mut self, field: FilterField) {
        self.set(field, UNSELECTED);
    }

    /// Cycle the field to the next enumerated value (wrapping), starting
    /// from the first option when unselected.
    pub fn select_next(&mut self, field: FilterField) {
        let options = field.options();
        let next = match options.iter().position(|o| *o == self.get(field)) {
            Some(i) => options[(i + 1) % options.len()],
            None => options[0],
        };
        self.set(field, next);
    }

    /// Cycle the field to the previous enumerated value (wrapping).
    pub fn select_prev(&mut self, field: FilterField) {
        let options = field.options();
        let prev = match options.iter().position(|o| *o == self.get(field)) {
            Some(i) => options[(i + options.len() - 1) % options.len()],
            None => options[options.len() - 1],
        };
        self.set(field, prev);
    }

    pub fn is_complete(&self) -> bool {
        FilterField::all().iter().all(|f| self.get(*f) != UNSELECTED)
    }

    pub fn missing(&self) -> Vec<FilterField> {
        FilterField::all()
            .into_iter()
            .filter(|f| self.get(*f) == UNSELECTED)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_updates_only_target_field() {
        let mut filters = FilterSelection::new();
        filters.set(FilterField::Language, "english");

        assert_eq!(filters.language, "english");
        assert_eq!(filters.board, UNSELECTED);
        assert_eq!(filters.class_level, UNSELECTED);
        assert_eq!(filters.subject, UNSELECTED);
    }

    #[test]
    fn test_every_enumerated_value_is_accepted() {
        let mut filters = FilterSelection::new();
        for field in FilterField::all() {
            for option in field.options() {
                filters.set(field, option);
                assert_eq!(filters.get(field), *option);
            }
        }
    }

    #[test]
    fn test_out_of_set_value_becomes_unselected() {
        let mut filters = FilterSelection::new();
        filters.set(FilterField::Board, "CBSE");
        filters.set(FilterField::Board, "NOT-A-BOARD");
        assert_eq!(filters.board, UNSELECTED);
    }

    #[test]
    fn test_is_complete() {
        let mut filters = FilterSelection::new();
        assert!(!filters.is_complete());

        filters.set(FilterField::Board, "CBSE");
        filters.set(FilterField::Language, "english");
        filters.set(FilterField::ClassLevel, "10");
        assert!(!filters.is_complete());

        filters.set(FilterField::Subject, "math");
        assert!(filters.is_complete());
    }

    #[test]
    fn test_missing_lists_unselected_fields() {
        let mut filters = FilterSelection::new();
        filters.set(FilterField::Board, "ICSE");
        filters.set(FilterField::Subject, "science");
        assert_eq!(
            filters.missing(),
            vec![FilterField::Language, FilterField::ClassLevel]
        );
    }

    #[test]
    fn test_select_next_cycles_through_options() {
        let mut filters = FilterSelection::new();
        filters.select_next(FilterField::Language);
        assert_eq!(filters.language, "hindi");
        filters.select_next(FilterField::Language);
        assert_eq!(filters.language, "english");
        filters.select_next(FilterField::Language);
        assert_eq!(filters.language, "hindi");
    }

    #[test]
    fn test_select_prev_from_unselected_wraps_to_last() {
        let mut filters = FilterSelection::new();
        filters.select_prev(FilterField::ClassLevel);
        assert_eq!(filters.class_level, "12");
        filters.select_prev(FilterField::ClassLevel);
        assert_eq!(filters.class_level, "11");
    }

    #[test]
    fn test_serializes_with_camel_case_class_level() {
        let mut filters = FilterSelection::new();
        filters.set(FilterField::ClassLevel, "11");
        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(json["classLevel"], "11");
        assert!(json.get("class_level").is_none());
    }
}
