//! Report options panel

use crate::error::ValidationError;
use crate::numeric::FieldValue;
use vdyp_tables::limits::{AGE_INCREMENT, END_YEAR, FINISHING_AGE, START_YEAR, STARTING_AGE, YEAR_INCREMENT};
use vdyp_tables::{AgeYearRange, NumericLimit, ProjectionType};

/// Report panel fields as entered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportInput<'a> {
    /// Which range drives the report
    pub range: AgeYearRange,
    /// Starting age
    pub starting_age: Option<&'a str>,
    /// Finishing age
    pub finishing_age: Option<&'a str>,
    /// Age increment
    pub age_increment: Option<&'a str>,
    /// Start year
    pub start_year: Option<&'a str>,
    /// End year
    pub end_year: Option<&'a str>,
    /// Year increment
    pub year_increment: Option<&'a str>,
    /// Report title
    pub report_title: Option<&'a str>,
    /// Projection type
    pub projection_type: Option<ProjectionType>,
}

impl ReportInput<'_> {
    /// `(start, end, increment)` of the selected range
    #[must_use]
    pub fn selected_range(&self) -> (Option<&str>, Option<&str>, Option<&str>) {
        match self.range {
            AgeYearRange::Age => (self.starting_age, self.finishing_age, self.age_increment),
            AgeYearRange::Year => (self.start_year, self.end_year, self.year_increment),
        }
    }
}

/// Report panel validator
#[derive(Debug, Clone, Copy)]
pub struct ReportValidator;

impl ReportValidator {
    /// Create validator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// End of the range must not precede its start; blanks pass
    pub fn validate_comparison(
        &self,
        range: AgeYearRange,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<(), ValidationError> {
        let (Some(start), Some(end)) = (FieldValue::parse(start).number(), FieldValue::parse(end).number()) else {
            return Ok(());
        };
        if end >= start {
            return Ok(());
        }
        Err(match range {
            AgeYearRange::Age => ValidationError::FinishAgeBeforeStartAge,
            AgeYearRange::Year => ValidationError::EndYearBeforeStartYear,
        })
    }

    /// Start, end and increment of the selected range must all be filled
    pub fn validate_required_fields(
        &self,
        range: AgeYearRange,
        start: Option<&str>,
        end: Option<&str>,
        increment: Option<&str>,
    ) -> Result<(), ValidationError> {
        if [start, end, increment].into_iter().any(|f| FieldValue::parse(f).is_blank()) {
            return Err(match range {
                AgeYearRange::Age => ValidationError::AgeFieldsRequired,
                AgeYearRange::Year => ValidationError::YearFieldsRequired,
            });
        }
        Ok(())
    }

    /// Age fields within their bounds; blanks pass
    pub fn validate_age_range(
        &self,
        starting_age: Option<&str>,
        finishing_age: Option<&str>,
        increment: Option<&str>,
    ) -> Result<(), ValidationError> {
        check(starting_age, STARTING_AGE, |min, max| ValidationError::StartingAgeOutOfRange { min, max })?;
        check(finishing_age, FINISHING_AGE, |min, max| ValidationError::FinishingAgeOutOfRange { min, max })?;
        check(increment, AGE_INCREMENT, |min, max| ValidationError::AgeIncrementOutOfRange { min, max })
    }

    /// Year fields within their bounds; blanks pass
    pub fn validate_year_range(
        &self,
        start_year: Option<&str>,
        end_year: Option<&str>,
        increment: Option<&str>,
    ) -> Result<(), ValidationError> {
        check(start_year, START_YEAR, |min, max| ValidationError::StartYearOutOfRange { min, max })?;
        check(end_year, END_YEAR, |min, max| ValidationError::EndYearOutOfRange { min, max })?;
        check(increment, YEAR_INCREMENT, |min, max| ValidationError::YearIncrementOutOfRange { min, max })
    }

    /// Title must contain something other than whitespace
    pub fn validate_report_title(&self, title: Option<&str>) -> Result<(), ValidationError> {
        match title.map(str::trim) {
            Some(t) if !t.is_empty() => Ok(()),
            _ => Err(ValidationError::ReportTitleRequired),
        }
    }

    /// A projection type must be chosen
    pub fn validate_projection_type(&self, projection_type: Option<ProjectionType>) -> Result<(), ValidationError> {
        projection_type.map(|_| ()).ok_or(ValidationError::ProjectionTypeRequired)
    }

    /// Run every check in confirmation order
    pub fn validate(&self, input: &ReportInput<'_>) -> Result<(), ValidationError> {
        self.validate_report_title(input.report_title)?;
        self.validate_projection_type(input.projection_type)?;

        let (start, end, increment) = input.selected_range();
        self.validate_required_fields(input.range, start, end, increment)?;
        self.validate_comparison(input.range, start, end)?;
        match input.range {
            AgeYearRange::Age => self.validate_age_range(start, end, increment),
            AgeYearRange::Year => self.validate_year_range(start, end, increment),
        }
    }
}

impl Default for ReportValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn check(
    value: Option<&str>,
    limit: NumericLimit,
    err: impl FnOnce(f64, f64) -> ValidationError,
) -> Result<(), ValidationError> {
    if FieldValue::parse(value).within(limit.min, limit.max) {
        Ok(())
    } else {
        Err(err(limit.min, limit.max))
    }
}
