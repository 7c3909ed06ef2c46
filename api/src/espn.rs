/// ESPN site API wire types. Only the news feed is consumed.
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct NewsResponse {
    pub articles: Vec<EspnArticle>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnArticle {
    /// Numeric on most articles, missing on some promos.
    pub id: Option<serde_json::Value>,
    pub headline: String,
    #[serde(default)]
    pub description: String,
    pub links: Option<EspnLinks>,
    #[serde(default)]
    pub images: Vec<EspnImage>,
    #[serde(default)]
    pub published: String,
    pub byline: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnLinks {
    pub web: Option<EspnLink>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnLink {
    pub href: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnImage {
    pub url: Option<String>,
}
