use std::fmt;
use std::str::FromStr;

/// Listing lifecycle bucket a caller can filter on.
///
/// The buckets are derived from `deadline` and `is_winners_announced`,
/// not from the stored `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingStatus {
    Open,
    Review,
    Closed,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Open => "OPEN",
            ListingStatus::Review => "REVIEW",
            ListingStatus::Closed => "CLOSED",
        }
    }
}

impl FromStr for ListingStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(ListingStatus::Open),
            "REVIEW" => Ok(ListingStatus::Review),
            "CLOSED" => Ok(ListingStatus::Closed),
            _ => Err(()),
        }
    }
}

/// Coarse skill bucket; expanded to concrete skill tags by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillCategory {
    Development,
    Design,
    Content,
    Other,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Development => "DEVELOPMENT",
            SkillCategory::Design => "DESIGN",
            SkillCategory::Content => "CONTENT",
            SkillCategory::Other => "OTHER",
        }
    }
}

impl FromStr for SkillCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEVELOPMENT" => Ok(SkillCategory::Development),
            "DESIGN" => Ok(SkillCategory::Design),
            "CONTENT" => Ok(SkillCategory::Content),
            "OTHER" => Ok(SkillCategory::Other),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Global,
    India,
    Vietnam,
    Germany,
    Turkey,
    Mexico,
    Uk,
    Uae,
    Nigeria,
    Israel,
    Balkan,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Global => "GLOBAL",
            Region::India => "INDIA",
            Region::Vietnam => "VIETNAM",
            Region::Germany => "GERMANY",
            Region::Turkey => "TURKEY",
            Region::Mexico => "MEXICO",
            Region::Uk => "UK",
            Region::Uae => "UAE",
            Region::Nigeria => "NIGERIA",
            Region::Israel => "ISRAEL",
            Region::Balkan => "BALKAN",
        }
    }
}

impl FromStr for Region {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GLOBAL" => Ok(Region::Global),
            "INDIA" => Ok(Region::India),
            "VIETNAM" => Ok(Region::Vietnam),
            "GERMANY" => Ok(Region::Germany),
            "TURKEY" => Ok(Region::Turkey),
            "MEXICO" => Ok(Region::Mexico),
            "UK" => Ok(Region::Uk),
            "UAE" => Ok(Region::Uae),
            "NIGERIA" => Ok(Region::Nigeria),
            "ISRAEL" => Ok(Region::Israel),
            "BALKAN" => Ok(Region::Balkan),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
