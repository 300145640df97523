use glob::Pattern;

/// Criteria for choosing the worksheet to read from a workbook.
#[derive(Clone, Debug, Default)]
pub struct Criteria {
    /// Sheet name patterns; the first sheet matching any of them is read.
    /// `None` selects the first sheet of the workbook.
    pub sheet_name_patterns: Option<Vec<Pattern>>,

    /// Read error cells (`#DIV/0!`, `#N/A`) as null instead of text.
    pub error_as_null: bool,
}

impl Criteria {
    /// Builds criteria selecting sheets by a single glob pattern.
    pub fn with_sheet_pattern(pattern: &str) -> Result<Self, glob::PatternError> {
        Ok(Criteria {
            sheet_name_patterns: Some(vec![Pattern::new(pattern)?]),
            ..Criteria::default()
        })
    }

    /// Checks if a sheet name matches the criteria patterns.
    /// Returns true if no patterns are specified or if name matches any pattern.
    pub fn accept(&self, sheet_name: &str) -> bool {
        match &self.sheet_name_patterns {
            Some(patterns) => patterns.iter().any(|pattern| pattern.matches(sheet_name)),
            None => true,
        }
    }
}
