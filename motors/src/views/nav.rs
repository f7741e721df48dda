//! Navigation bar and classification `<select>` options.

use serde::Serialize;

use crate::{db::models::classifications::ClassificationDBResponse, types::ClassificationId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub title: String,
}

/// Home followed by one link per classification, in the order given.
pub fn build_nav(classifications: &[ClassificationDBResponse]) -> Vec<NavLink> {
    std::iter::once(NavLink {
        label: "Home".to_string(),
        href: "/".to_string(),
        title: "Home page".to_string(),
    })
    .chain(classifications.iter().map(|c| NavLink {
        label: c.classification_name.clone(),
        href: format!("/inv/type/{}", c.classification_id),
        title: format!("See our inventory of {} vehicles", c.classification_name),
    }))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationOption {
    pub value: ClassificationId,
    pub label: String,
    pub selected: bool,
}

/// One option per classification, with `selected` marking the current choice.
pub fn classification_options(
    classifications: &[ClassificationDBResponse],
    selected: Option<ClassificationId>,
) -> Vec<ClassificationOption> {
    classifications
        .iter()
        .map(|c| ClassificationOption {
            value: c.classification_id,
            label: c.classification_name.clone(),
            selected: Some(c.classification_id) == selected,
        })
        .collect()
}
