//! Static page content, embedded at build time.

use serde::Deserialize;
use thiserror::Error;

const PORTFOLIO_JSON: &str = include_str!("../content/portfolio.json");

pub const DEFAULT_THUMBNAIL: &str =
    "https://static-cse.canva.com/blob/1808021/create_youtube-thumbnails_lead4x.1db8ba01.avif";
const YEARS_PLACEHOLDER: &str = "{years}";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("embedded portfolio content is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Portfolio {
    pub profile: Profile,
    pub skills: Vec<String>,
    pub experience: Vec<Job>,
    pub projects: Vec<Project>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub headline: String,
    /// May contain `{years}`, replaced with the computed experience.
    pub about: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub resume_url: String,
    pub resume_size_hint: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Job {
    pub company: String,
    pub role: String,
    pub period: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub tech: Vec<String>,
}

impl Profile {
    pub fn about_text(&self, years: i32) -> String {
        self.about.replace(YEARS_PLACEHOLDER, &years.to_string())
    }

    pub fn mailto(&self) -> String {
        format!("mailto:{}", self.email)
    }
}

impl Project {
    /// Blank or missing thumbnails fall back to the default image.
    pub fn thumbnail_src(&self) -> &str {
        self.thumbnail
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_THUMBNAIL)
    }
}

pub fn parse(source: &str) -> Result<Portfolio, ContentError> {
    Ok(serde_json::from_str(source)?)
}

pub fn load() -> Result<Portfolio, ContentError> {
    parse(PORTFOLIO_JSON)
}
