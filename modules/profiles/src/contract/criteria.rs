//! Strongly-typed browse filter, built and validated before it reaches the
//! persistence layer.

use chrono::{Datelike, Utc};

use crate::domain::error::DomainError;

const MAX_AGE: i32 = 120;

/// Validated filter criteria for profile browsing.
///
/// Age bounds are already translated into birth-year bounds:
/// a *minimum* age caps the birth year from above, a *maximum* age from below.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseCriteria {
    pub gender: Option<String>,
    pub city: Option<String>,
    /// Inclusive upper bound on birth year (from min age).
    pub birth_year_max: Option<i32>,
    /// Inclusive lower bound on birth year (from max age).
    pub birth_year_min: Option<i32>,
}

impl BrowseCriteria {
    pub fn builder() -> BrowseCriteriaBuilder {
        BrowseCriteriaBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BrowseCriteriaBuilder {
    gender: Option<String>,
    city: Option<String>,
    min_age: Option<i32>,
    max_age: Option<i32>,
}

impl BrowseCriteriaBuilder {
    pub fn gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn min_age(mut self, age: i32) -> Self {
        self.min_age = Some(age);
        self
    }

    pub fn max_age(mut self, age: i32) -> Self {
        self.max_age = Some(age);
        self
    }

    /// Validate bounds and translate ages to birth years.
    pub fn build(self) -> Result<BrowseCriteria, DomainError> {
        if let Some(age) = self.min_age {
            if !(0..=MAX_AGE).contains(&age) {
                return Err(DomainError::validation("minAge", "age out of range"));
            }
        }
        if let Some(age) = self.max_age {
            if !(0..=MAX_AGE).contains(&age) {
                return Err(DomainError::validation("maxAge", "age out of range"));
            }
        }
        if let (Some(min), Some(max)) = (self.min_age, self.max_age) {
            if min > max {
                return Err(DomainError::validation(
                    "minAge",
                    "minAge must not exceed maxAge",
                ));
            }
        }

        let current_year = Utc::now().year();
        Ok(BrowseCriteria {
            gender: self.gender,
            city: self.city,
            birth_year_max: self.min_age.map(|age| current_year - age),
            birth_year_min: self.max_age.map(|age| current_year - age),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_builds_empty_criteria() {
        let criteria = BrowseCriteria::builder().build().unwrap();
        assert_eq!(criteria, BrowseCriteria::default());
    }

    #[test]
    fn ages_translate_to_birth_year_bounds() {
        let current_year = Utc::now().year();
        let criteria = BrowseCriteria::builder()
            .min_age(25)
            .max_age(35)
            .build()
            .unwrap();
        assert_eq!(criteria.birth_year_max, Some(current_year - 25));
        assert_eq!(criteria.birth_year_min, Some(current_year - 35));
    }

    #[test]
    fn inverted_age_range_rejected() {
        let err = BrowseCriteria::builder()
            .min_age(40)
            .max_age(30)
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn absurd_ages_rejected() {
        assert!(BrowseCriteria::builder().min_age(-1).build().is_err());
        assert!(BrowseCriteria::builder().max_age(200).build().is_err());
    }

    #[test]
    fn gender_and_city_pass_through() {
        let criteria = BrowseCriteria::builder()
            .gender("F")
            .city("Gaborone")
            .build()
            .unwrap();
        assert_eq!(criteria.gender.as_deref(), Some("F"));
        assert_eq!(criteria.city.as_deref(), Some("Gaborone"));
    }
}
