pub mod criteria;
pub mod model;

pub use criteria::{BrowseCriteria, BrowseCriteriaBuilder};
pub use model::{NewProfile, Profile, ProfileCard, VisibilityPrefs};
