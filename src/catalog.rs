//! Static lookup tables shared read-only by every request.

use crate::models::{Region, SkillCategory};

/// Concrete skill tags stored on listings for each filterable category.
pub fn skill_tags(category: SkillCategory) -> &'static [&'static str] {
    match category {
        SkillCategory::Development => &["Frontend", "Backend", "Blockchain", "Mobile"],
        SkillCategory::Design => &["Design"],
        SkillCategory::Content => &["Content"],
        SkillCategory::Other => &["Other", "Growth", "Community"],
    }
}

pub struct RegionEntry {
    pub region: Region,
    pub countries: &'static [&'static str],
}

/// Ordered: the first entry listing a country wins.
pub static REGION_TABLE: &[RegionEntry] = &[
    RegionEntry {
        region: Region::India,
        countries: &["India"],
    },
    RegionEntry {
        region: Region::Vietnam,
        countries: &["Vietnam"],
    },
    RegionEntry {
        region: Region::Germany,
        countries: &["Germany"],
    },
    RegionEntry {
        region: Region::Turkey,
        countries: &["Turkey"],
    },
    RegionEntry {
        region: Region::Mexico,
        countries: &["Mexico"],
    },
    RegionEntry {
        region: Region::Uk,
        countries: &["United Kingdom"],
    },
    RegionEntry {
        region: Region::Uae,
        countries: &["United Arab Emirates"],
    },
    RegionEntry {
        region: Region::Nigeria,
        countries: &["Nigeria"],
    },
    RegionEntry {
        region: Region::Israel,
        countries: &["Israel"],
    },
    RegionEntry {
        region: Region::Balkan,
        countries: &[
            "Albania",
            "Bosnia and Herzegovina",
            "Bulgaria",
            "Croatia",
            "Kosovo",
            "Montenegro",
            "North Macedonia",
            "Romania",
            "Serbia",
            "Slovenia",
        ],
    },
];

/// Region whose country list contains `location` exactly.
pub fn region_for_location(location: &str) -> Option<Region> {
    REGION_TABLE
        .iter()
        .find(|entry| entry.countries.contains(&location))
        .map(|entry| entry.region)
}
