//! Content types for Folio.
//!
//! One module per content type shown on the public site.

pub mod career;
pub mod contact;
pub mod hero;
pub mod id;
pub mod portfolio;
pub mod skill;

pub use career::{CareerItem, CareerType};
pub use contact::ContactInfo;
pub use hero::HeroData;
pub use id::{RecordId, RecordIdError};
pub use portfolio::{PortfolioItem, join_tags, split_tags};
pub use skill::{SkillCategory, SkillItem};
