//! Retrieval filter construction.
//!
//! Turns the category toggles of a query into the attribute filter applied
//! to the knowledge-base vector search. The expression serializes to the
//! service's own JSON shape, e.g.
//! `{"orAll": [{"equals": {"key": "content_type", "value": "cloudfix_blogpost"}}]}`.

use serde::{Deserialize, Serialize};

/// Metadata key holding the kind of source document.
pub const CONTENT_TYPE_KEY: &str = "content_type";

/// Metadata key holding the livestream episode number.
pub const EPISODE_NUMBER_KEY: &str = "episode_number";

/// `content_type` value of full livestream episodes.
pub const LIVESTREAM_TAG: &str = "ame_full_episode";

/// `content_type` value of blog posts.
pub const BLOG_POST_TAG: &str = "cloudfix_blogpost";

/// Value side of a filter condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    Number(f64),
}

/// A `(key, value)` pair compared against document metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterAttribute {
    pub key: String,
    pub value: FilterValue,
}

impl FilterAttribute {
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: FilterValue::Text(value.into()),
        }
    }

    pub fn number(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value: FilterValue::Number(value),
        }
    }
}

/// One node of a filter tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterNode {
    Equals(FilterAttribute),
    GreaterThanOrEquals(FilterAttribute),
    LessThanOrEquals(FilterAttribute),
    AndAll(Vec<FilterNode>),
    OrAll(Vec<FilterNode>),
}

/// Top-level retrieval filter: a document matches if it satisfies any of
/// the listed conditions. An empty expression applies no filter at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterExpression {
    #[serde(rename = "orAll", default, skip_serializing_if = "Vec::is_empty")]
    conditions: Vec<FilterNode>,
}

impl FilterExpression {
    /// The unrestricted expression.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Top-level OR-joined conditions, in insertion order.
    pub fn conditions(&self) -> &[FilterNode] {
        &self.conditions
    }

    /// The expression as a single tree node, `None` when unrestricted.
    pub fn to_node(&self) -> Option<FilterNode> {
        if self.conditions.is_empty() {
            None
        } else {
            Some(FilterNode::OrAll(self.conditions.clone()))
        }
    }
}

/// Category toggle state captured from the user for one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterToggles {
    /// Include full livestream episodes
    pub livestream: bool,

    /// Include blog posts
    pub blog_posts: bool,

    /// Lowest episode number to include (livestream only)
    pub min_episode: Option<f64>,

    /// Highest episode number to include (livestream only)
    pub max_episode: Option<f64>,
}

impl Default for FilterToggles {
    fn default() -> Self {
        Self {
            livestream: true,
            blog_posts: true,
            min_episode: None,
            max_episode: None,
        }
    }
}

impl FilterToggles {
    pub fn build(&self) -> FilterExpression {
        build_filter(
            self.livestream,
            self.blog_posts,
            self.min_episode,
            self.max_episode,
        )
    }
}

/// Build the retrieval filter for the enabled categories.
///
/// Episode bounds only form a range when both are given: the equality test
/// and the two bounds are then grouped under `andAll`. With a single bound
/// the bound becomes its own top-level OR member, so it widens rather than
/// narrows the match.
// TODO: confirm with product whether a single episode bound should also
// restrict the livestream category instead of being OR-joined.
pub fn build_filter(
    include_livestream: bool,
    include_blog_posts: bool,
    min_bound: Option<f64>,
    max_bound: Option<f64>,
) -> FilterExpression {
    let mut conditions = Vec::new();

    if include_livestream {
        let mut livestream = vec![FilterNode::Equals(FilterAttribute::text(
            CONTENT_TYPE_KEY,
            LIVESTREAM_TAG,
        ))];

        if let Some(min) = min_bound {
            livestream.push(FilterNode::GreaterThanOrEquals(FilterAttribute::number(
                EPISODE_NUMBER_KEY,
                min,
            )));
        }

        if let Some(max) = max_bound {
            livestream.push(FilterNode::LessThanOrEquals(FilterAttribute::number(
                EPISODE_NUMBER_KEY,
                max,
            )));
        }

        if min_bound.is_some() && max_bound.is_some() {
            conditions.push(FilterNode::AndAll(livestream));
        } else {
            conditions.extend(livestream);
        }
    }

    if include_blog_posts {
        conditions.push(FilterNode::Equals(FilterAttribute::text(
            CONTENT_TYPE_KEY,
            BLOG_POST_TAG,
        )));
    }

    FilterExpression { conditions }
}
