//! Material identity, classification and tools.

use std::fmt;
use std::sync::Arc;

/// Tool a player can touch a material with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tool {
    Knife,
    Pestle,
    Scraper,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Knife, Tool::Pestle, Tool::Scraper];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Knife => "knife",
            Tool::Pestle => "pestle",
            Tool::Scraper => "scraper",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl std::str::FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tool {s:?} (expected knife|pestle|scraper)"))
    }
}

/// Fixed category of a material: picks the required tool and the scoring formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    RootCut,
    WoodGrind,
    RindScrape,
}

impl Classification {
    /// The only tool that may touch a material of this classification.
    pub fn required_tool(self) -> Tool {
        match self {
            Classification::RootCut => Tool::Knife,
            Classification::WoodGrind => Tool::Pestle,
            Classification::RindScrape => Tool::Scraper,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Classification::RootCut => "root_cut",
            Classification::WoodGrind => "wood_grind",
            Classification::RindScrape => "rind_scrape",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Stable material identifier used as a value key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(Arc<str>);

impl MaterialId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for MaterialId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Immutable material descriptor. Compared by id only.
#[derive(Debug, Clone)]
pub struct Material {
    pub id: MaterialId,
    pub classification: Classification,
    pub display_name: String,
}

impl Material {
    pub fn new(id: impl AsRef<str>, classification: Classification) -> Self {
        let id = MaterialId::new(id);
        Self {
            display_name: id.to_string(),
            id,
            classification,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }
}

impl PartialEq for Material {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Material {}
