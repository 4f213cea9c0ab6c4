use std::convert::Infallible;
use std::fmt::Display;
use std::str::FromStr;

use arcstr::ArcStr;
use serde::{
    Deserialize,
    Serialize,
};

/// Identifier of a contributing research site.
///
/// Sites are ordered lexicographically by name. That order fixes the
/// tie-break between equally sized site combinations during Venn
/// segmentation and the key order of every serialized site map.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Site(ArcStr);

impl Site {
    pub fn new<S: Into<ArcStr>>(name: S) -> Self { Self(name.into()) }

    pub fn as_str(&self) -> &str { self.0.as_str() }
}

impl Display for Site {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Site {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Site::new(s.trim())) }
}

impl From<&str> for Site {
    fn from(value: &str) -> Self { Site::new(value) }
}

impl From<String> for Site {
    fn from(value: String) -> Self { Site::new(value) }
}

impl AsRef<str> for Site {
    fn as_ref(&self) -> &str { self.as_str() }
}
