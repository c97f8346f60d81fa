//! Public site content.
//!
//! Assembles every section the public pages render from the lenient service
//! methods. A fetch failure never reaches the visitor: a missing hero or
//! contact record is replaced by built-in placeholder content, and a failing
//! collection renders as an empty section.
//!
//! The assembled content is cached (5 minutes by default). Every BackOffice
//! save or delete drops the cached copy, including one still being fetched
//! when the write lands.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use tracing::{debug, instrument};

use folio_core::{CareerItem, ContactInfo, HeroData, PortfolioItem, SkillCategory, SkillItem};

use crate::services::{CareerService, ContactService, HeroService, PortfolioService, SkillService};

const CACHE_KEY: &str = "site";

/// Placeholder hero shown until one is saved.
#[must_use]
pub fn placeholder_hero() -> HeroData {
    HeroData::new(
        "Hi, I build things for the web",
        "Full-stack developer crafting fast, accessible products.",
    )
}

/// Placeholder contact details shown until they are saved.
#[must_use]
pub fn placeholder_contact() -> ContactInfo {
    ContactInfo {
        id: None,
        email: "hello@example.com".to_string(),
        phone: String::new(),
        location: "Remote".to_string(),
    }
}

/// Sections of the public site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Hero,
    Contact,
}

/// Skills sharing a category, under the category's heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillGroup {
    pub category: SkillCategory,
    pub label: &'static str,
    pub skills: Vec<SkillItem>,
}

/// Group skills by category in display order, skipping empty categories.
#[must_use]
pub fn group_skills(skills: &[SkillItem]) -> Vec<SkillGroup> {
    SkillCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let members: Vec<SkillItem> = skills
                .iter()
                .filter(|skill| skill.category == category)
                .cloned()
                .collect();
            (!members.is_empty()).then(|| SkillGroup {
                category,
                label: category.label(),
                skills: members,
            })
        })
        .collect()
}

/// Everything the public pages render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    pub hero: HeroData,
    pub portfolio: Vec<PortfolioItem>,
    pub career: Vec<CareerItem>,
    pub contact: ContactInfo,
    pub skills: Vec<SkillItem>,
    /// `skills` grouped for the skills grid.
    pub skill_groups: Vec<SkillGroup>,
    /// Sections rendered from placeholder content.
    pub placeholders: Vec<Section>,
}

/// Cached loader for [`SiteContent`].
///
/// Cheaply cloneable; clones share the cache.
#[derive(Clone)]
pub struct SiteContentLoader {
    hero: HeroService,
    contact: ContactService,
    portfolio: PortfolioService,
    career: CareerService,
    skills: SkillService,
    cache: Cache<&'static str, Arc<SiteContent>>,
    /// Bumped by every invalidation.
    generation: Arc<AtomicU64>,
}

impl SiteContentLoader {
    /// Create a loader over the given services.
    #[must_use]
    pub fn new(
        hero: HeroService,
        contact: ContactService,
        portfolio: PortfolioService,
        career: CareerService,
        skills: SkillService,
        ttl: Duration,
    ) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();

        Self {
            hero,
            contact,
            portfolio,
            career,
            skills,
            cache,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Site content, from cache when fresh.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Arc<SiteContent> {
        if let Some(content) = self.cache.get(CACHE_KEY).await {
            debug!("Site content cache hit");
            return content;
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let content = Arc::new(self.fetch().await);
        self.cache.insert(CACHE_KEY, Arc::clone(&content)).await;

        // A write landed while fetching; the result may predate it
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Site content changed during fetch, not caching");
            self.cache.invalidate(CACHE_KEY).await;
        }
        content
    }

    /// Drop the cached content so the next [`load`](Self::load) refetches.
    ///
    /// A load already in flight returns its result but does not cache it.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cache.invalidate_all();
    }

    async fn fetch(&self) -> SiteContent {
        let mut placeholders = Vec::new();

        let hero = self.hero.get_or_none().await.unwrap_or_else(|| {
            placeholders.push(Section::Hero);
            placeholder_hero()
        });
        let portfolio = self.portfolio.get_all_or_empty().await;
        let career = self.career.get_all_or_empty().await;
        let contact = self.contact.get_or_none().await.unwrap_or_else(|| {
            placeholders.push(Section::Contact);
            placeholder_contact()
        });
        let skills = self.skills.get_all_or_empty().await;

        debug!(
            portfolio = portfolio.len(),
            career = career.len(),
            skills = skills.len(),
            placeholders = placeholders.len(),
            "Site content fetched"
        );

        SiteContent {
            hero,
            portfolio,
            career,
            contact,
            skill_groups: group_skills(&skills),
            skills,
            placeholders,
        }
    }
}

impl std::fmt::Debug for SiteContentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteContentLoader")
            .field("cached", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}
