use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::fmt;
use std::str::FromStr;

/// A geographic deployment target, e.g. `westus`.
///
/// Identifiers are trimmed and lower-cased; only ASCII letters and digits are
/// accepted so the value can be embedded in resource names and tag sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region(String);

impl Region {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Region {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "region identifier must not be empty"
            )));
        }
        if !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "invalid region identifier: {}",
                s.trim()
            )));
        }
        Ok(Region(normalized))
    }
}

impl TryFrom<String> for Region {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, duplicate-free set of regions. The first entry is the primary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionList(Vec<Region>);

impl RegionList {
    /// Parse a comma-separated list such as `"westus,eastus,westeurope"`.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let mut regions: Vec<Region> = Vec::new();
        for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
            let region: Region = part.parse()?;
            if regions.contains(&region) {
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "region {} listed more than once",
                    region
                )));
            }
            regions.push(region);
        }
        Self::new(regions)
    }

    pub fn new(regions: Vec<Region>) -> Result<Self, AppError> {
        if regions.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "at least one region is required"
            )));
        }
        Ok(Self(regions))
    }

    pub fn primary(&self) -> &Region {
        &self.0[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a RegionList {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
